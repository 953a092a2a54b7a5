use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use super::types::{
    ActualScore, BowlerId, GameNumber, LeaderboardEntry, PendingPrediction, Points,
    PredictionResult, PredictionSlot, ResolvedPrediction, WeekId,
};
use crate::domain::{GameScore, Prediction, SeriesPrediction, Week, WeeklySeries};

/// Upper bound of each accuracy tier (inclusive) and the points it pays.
/// Anything past the last tier scores nothing.
const POINT_TIERS: [(u32, Points); 5] = [(0, 10), (10, 7), (25, 5), (50, 3), (75, 1)];

pub fn points_for_difference(difference: u32) -> Points {
    POINT_TIERS
        .iter()
        .find(|(max_difference, _)| difference <= *max_difference)
        .map(|(_, points)| *points)
        .unwrap_or(0)
}

/// Matches each prediction with the target's actual value. Predictions whose
/// target has no actual yet stay unresolved (`difference`/`points` = `None`).
pub fn resolve_results(
    predictions: &[PendingPrediction],
    actuals: &[ActualScore],
) -> Vec<ResolvedPrediction> {
    let mut actual_by_bowler: HashMap<BowlerId, i32> = HashMap::new();
    for actual in actuals {
        actual_by_bowler.entry(actual.bowler_id).or_insert(actual.value);
    }

    predictions
        .iter()
        .map(|prediction| {
            let actual = actual_by_bowler.get(&prediction.target_id).copied();
            let difference = actual.map(|value| prediction.predicted.abs_diff(value));

            ResolvedPrediction {
                predictor_id: prediction.predictor_id,
                target_id: prediction.target_id,
                predicted: prediction.predicted,
                actual,
                difference,
                points: difference.map(points_for_difference),
            }
        })
        .collect()
}

/// Resolves one week's per-game predictions against that week's entered scores.
pub fn resolve_week(week: &Week, predictions: &[Prediction], games: &[GameScore]) -> Vec<PredictionResult> {
    let mut results = Vec::with_capacity(predictions.len());

    for game_number in GameNumber::ALL {
        let pending: Vec<PendingPrediction> = predictions
            .iter()
            .filter(|p| p.week_id == week.id && p.game_number == game_number)
            .map(|p| PendingPrediction {
                predictor_id: p.predictor_id,
                target_id: p.target_id,
                predicted: p.predicted_score,
            })
            .collect();

        let actuals: Vec<ActualScore> = games
            .iter()
            .filter(|g| g.week_id == week.id && g.game_number == game_number)
            .filter_map(|g| {
                g.score.map(|value| ActualScore {
                    bowler_id: g.bowler_id,
                    value,
                })
            })
            .collect();

        let slot = PredictionSlot::Game(game_number);
        results.extend(
            resolve_results(&pending, &actuals)
                .into_iter()
                .map(|resolved| with_week(resolved, week, slot)),
        );
    }

    sort_results(&mut results);
    results
}

/// Legacy series-total predictions, scored against each target's series for
/// the week with the same tier table.
///
/// A target's series counts as soon as one game is entered, so a prediction
/// can resolve against a partial total and move as the remaining games come
/// in.
pub fn resolve_series_week(
    week: &Week,
    predictions: &[SeriesPrediction],
    series: &[WeeklySeries],
) -> Vec<PredictionResult> {
    let pending: Vec<PendingPrediction> = predictions
        .iter()
        .filter(|p| p.week_id == week.id)
        .map(|p| PendingPrediction {
            predictor_id: p.predictor_id,
            target_id: p.target_id,
            predicted: p.predicted_series,
        })
        .collect();

    let actuals: Vec<ActualScore> = series
        .iter()
        .filter(|s| s.week_id == week.id && s.games_entered > 0)
        .map(|s| ActualScore {
            bowler_id: s.bowler_id,
            value: s.series_total,
        })
        .collect();

    let mut results: Vec<PredictionResult> = resolve_results(&pending, &actuals)
        .into_iter()
        .map(|resolved| with_week(resolved, week, PredictionSlot::Series))
        .collect();

    sort_results(&mut results);
    results
}

fn with_week(resolved: ResolvedPrediction, week: &Week, slot: PredictionSlot) -> PredictionResult {
    PredictionResult {
        predictor_id: resolved.predictor_id,
        target_id: resolved.target_id,
        week_id: week.id,
        week_number: week.week_number,
        slot,
        predicted_score: resolved.predicted,
        actual_score: resolved.actual,
        difference: resolved.difference,
        points: resolved.points,
    }
}

fn sort_results(results: &mut [PredictionResult]) {
    results.sort_by_key(|r| (r.week_number, r.predictor_id, r.target_id, r.slot));
}

#[derive(Default)]
struct PredictorTally {
    points: Points,
    differences: Vec<u32>,
    count: usize,
}

/// Aggregates resolved results per predictor. Highest total first; on equal
/// points the smaller average miss ranks higher, then the lower bowler id.
/// Predictors with nothing resolved are left out entirely.
pub fn leaderboard(results: &[PredictionResult]) -> Vec<LeaderboardEntry> {
    let mut tallies: BTreeMap<BowlerId, PredictorTally> = BTreeMap::new();

    for result in results {
        let Some(points) = result.points else {
            continue;
        };
        let tally = tallies.entry(result.predictor_id).or_default();
        tally.points += points;
        if let Some(difference) = result.difference {
            tally.differences.push(difference);
        }
        tally.count += 1;
    }

    let mut entries: Vec<LeaderboardEntry> = tallies
        .into_iter()
        .map(|(bowler_id, tally)| LeaderboardEntry {
            bowler_id,
            total_points: tally.points,
            avg_difference: mean_difference(&tally.differences),
            predictions_count: tally.count,
        })
        .collect();

    entries.sort_by(compare_entries);
    entries
}

pub fn weekly_leaderboard(results: &[PredictionResult], week_id: WeekId) -> Vec<LeaderboardEntry> {
    let week_results: Vec<PredictionResult> = results
        .iter()
        .filter(|r| r.week_id == week_id)
        .cloned()
        .collect();
    leaderboard(&week_results)
}

/// Best predictor of the week, if anything has been resolved.
pub fn weekly_winner(results: &[PredictionResult], week_id: WeekId) -> Option<LeaderboardEntry> {
    weekly_leaderboard(results, week_id).into_iter().next()
}

/// Winner of every week with at least one resolved result, newest week first.
pub fn weekly_winners(results: &[PredictionResult]) -> Vec<(i32, LeaderboardEntry)> {
    let mut by_week: BTreeMap<i32, Vec<PredictionResult>> = BTreeMap::new();
    for result in results {
        by_week.entry(result.week_number).or_default().push(result.clone());
    }

    by_week
        .into_iter()
        .rev()
        .filter_map(|(week_number, week_results)| {
            leaderboard(&week_results)
                .into_iter()
                .next()
                .map(|winner| (week_number, winner))
        })
        .collect()
}

fn mean_difference(differences: &[u32]) -> f64 {
    if differences.is_empty() {
        return 0.0;
    }
    let total: u64 = differences.iter().map(|&d| d as u64).sum();
    total as f64 / differences.len() as f64
}

fn compare_entries(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.total_points
        .cmp(&a.total_points)
        .then_with(|| a.avg_difference.total_cmp(&b.avg_difference))
        .then_with(|| a.bowler_id.cmp(&b.bowler_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week(id: WeekId, week_number: i32) -> Week {
        Week {
            id,
            week_number,
            bowling_date: None,
            is_complete: false,
            predictions_locked: false,
            created_at: None,
        }
    }

    fn result(predictor_id: BowlerId, week_id: WeekId, difference: Option<u32>) -> PredictionResult {
        PredictionResult {
            predictor_id,
            target_id: 99,
            week_id,
            week_number: week_id,
            slot: PredictionSlot::Game(GameNumber::First),
            predicted_score: 150,
            actual_score: difference.map(|d| 150 + d as i32),
            difference,
            points: difference.map(points_for_difference),
        }
    }

    #[test]
    fn test_points_table_boundaries() {
        assert_eq!(points_for_difference(0), 10);
        assert_eq!(points_for_difference(1), 7);
        assert_eq!(points_for_difference(10), 7);
        assert_eq!(points_for_difference(11), 5);
        assert_eq!(points_for_difference(25), 5);
        assert_eq!(points_for_difference(26), 3);
        assert_eq!(points_for_difference(50), 3);
        assert_eq!(points_for_difference(51), 1);
        assert_eq!(points_for_difference(75), 1);
        assert_eq!(points_for_difference(76), 0);
        assert_eq!(points_for_difference(300), 0);
    }

    #[test]
    fn test_points_never_increase_with_difference() {
        let mut previous = points_for_difference(0);
        for difference in 1..=900 {
            let points = points_for_difference(difference);
            assert!(points <= previous, "points rose at difference {}", difference);
            previous = points;
        }
    }

    #[test]
    fn test_resolve_results() {
        let predictions = vec![
            PendingPrediction { predictor_id: 1, target_id: 2, predicted: 180 },
            PendingPrediction { predictor_id: 1, target_id: 3, predicted: 150 },
            PendingPrediction { predictor_id: 2, target_id: 3, predicted: 150 },
        ];
        let actuals = vec![
            ActualScore { bowler_id: 2, value: 195 },
            ActualScore { bowler_id: 3, value: 150 },
        ];

        let resolved = resolve_results(&predictions, &actuals);

        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved[0].actual, Some(195));
        assert_eq!(resolved[0].difference, Some(15));
        assert_eq!(resolved[0].points, Some(5));
        assert_eq!(resolved[1].difference, Some(0));
        assert_eq!(resolved[1].points, Some(10));
    }

    #[test]
    fn test_unresolved_is_distinct_from_zero_points() {
        let predictions = vec![
            PendingPrediction { predictor_id: 1, target_id: 2, predicted: 100 },
            PendingPrediction { predictor_id: 1, target_id: 3, predicted: 100 },
        ];
        let actuals = vec![ActualScore { bowler_id: 3, value: 250 }];

        let resolved = resolve_results(&predictions, &actuals);

        assert_eq!(resolved[0].actual, None);
        assert_eq!(resolved[0].difference, None);
        assert_eq!(resolved[0].points, None);

        assert_eq!(resolved[1].difference, Some(150));
        assert_eq!(resolved[1].points, Some(0));
    }

    #[test]
    fn test_leaderboard_skips_unresolved_predictors() {
        let results = vec![result(1, 1, Some(5)), result(2, 1, None), result(2, 1, None)];

        let board = leaderboard(&results);

        assert_eq!(board.len(), 1);
        assert_eq!(board[0].bowler_id, 1);
        assert_eq!(board[0].total_points, 7);
        assert_eq!(board[0].predictions_count, 1);
    }

    #[test]
    fn test_leaderboard_ties_go_to_smaller_average_difference() {
        let mut entries = vec![
            LeaderboardEntry { bowler_id: 1, total_points: 20, avg_difference: 5.0, predictions_count: 3 },
            LeaderboardEntry { bowler_id: 2, total_points: 20, avg_difference: 2.0, predictions_count: 3 },
            LeaderboardEntry { bowler_id: 3, total_points: 24, avg_difference: 9.0, predictions_count: 3 },
        ];

        entries.sort_by(compare_entries);

        let order: Vec<BowlerId> = entries.iter().map(|e| e.bowler_id).collect();
        assert_eq!(order, vec![3, 2, 1]);
    }

    #[test]
    fn test_leaderboard_orders_point_ties_by_accuracy() {
        // Both end on 14 points; bowler 3 missed by 10 twice, bowler 4 by 1 twice.
        let results = vec![
            result(3, 1, Some(10)),
            result(3, 1, Some(10)),
            result(4, 1, Some(1)),
            result(4, 1, Some(1)),
        ];

        let board = leaderboard(&results);

        assert_eq!(board[0].total_points, 14);
        assert_eq!(board[1].total_points, 14);
        assert_eq!(board[0].bowler_id, 4);
        assert_eq!(board[0].avg_difference, 1.0);
        assert_eq!(board[1].avg_difference, 10.0);
    }

    #[test]
    fn test_leaderboard_totals_match_manual_sum() {
        let results = vec![
            result(1, 1, Some(0)),
            result(1, 2, Some(30)),
            result(2, 1, Some(60)),
            result(2, 2, None),
            result(3, 2, Some(100)),
        ];

        let board = leaderboard(&results);

        for entry in &board {
            let expected: Points = results
                .iter()
                .filter(|r| r.predictor_id == entry.bowler_id)
                .filter_map(|r| r.points)
                .sum();
            assert_eq!(entry.total_points, expected);
        }
        // Bowler 3 is resolved with zero points and still listed.
        assert!(board.iter().any(|e| e.bowler_id == 3 && e.total_points == 0));
    }

    #[test]
    fn test_weekly_leaderboard_and_winner() {
        let results = vec![
            result(1, 1, Some(0)),
            result(2, 1, Some(40)),
            result(2, 2, Some(0)),
            result(1, 2, None),
        ];

        let week_two = weekly_leaderboard(&results, 2);
        assert_eq!(week_two.len(), 1);
        assert_eq!(week_two[0].bowler_id, 2);

        assert_eq!(weekly_winner(&results, 1).map(|e| e.bowler_id), Some(1));
        assert_eq!(weekly_winner(&results, 3), None);
    }

    #[test]
    fn test_weekly_winners_newest_first() {
        let results = vec![
            result(1, 1, Some(0)),
            result(2, 1, Some(30)),
            result(2, 2, Some(5)),
            result(1, 2, Some(60)),
            result(1, 3, None),
            result(2, 4, Some(0)),
            result(1, 4, Some(0)),
        ];

        let winners = weekly_winners(&results);
        let summary: Vec<(i32, BowlerId, Points)> = winners
            .iter()
            .map(|(week_number, entry)| (*week_number, entry.bowler_id, entry.total_points))
            .collect();

        // Week 3 has nothing resolved; week 4 is a full tie settled by bowler id.
        assert_eq!(summary, vec![(4, 1, 10), (2, 2, 7), (1, 1, 10)]);
    }

    #[test]
    fn test_resolve_week_matches_game_numbers() {
        let week = week(7, 3);
        let predictions = vec![
            Prediction { week_id: 7, predictor_id: 1, target_id: 2, game_number: GameNumber::First, predicted_score: 180 },
            Prediction { week_id: 7, predictor_id: 1, target_id: 2, game_number: GameNumber::Second, predicted_score: 180 },
            Prediction { week_id: 7, predictor_id: 1, target_id: 2, game_number: GameNumber::Third, predicted_score: 180 },
            Prediction { week_id: 8, predictor_id: 1, target_id: 2, game_number: GameNumber::First, predicted_score: 180 },
        ];
        let games = vec![
            GameScore { week_id: 7, bowler_id: 2, game_number: GameNumber::First, score: Some(180) },
            GameScore { week_id: 7, bowler_id: 2, game_number: GameNumber::Second, score: Some(200) },
            GameScore { week_id: 7, bowler_id: 2, game_number: GameNumber::Third, score: None },
        ];

        let results = resolve_week(&week, &predictions, &games);

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.week_number == 3 && r.week_id == 7));
        assert_eq!(results[0].slot, PredictionSlot::Game(GameNumber::First));
        assert_eq!(results[0].points, Some(10));
        assert_eq!(results[1].difference, Some(20));
        assert_eq!(results[1].points, Some(5));
        assert_eq!(results[2].actual_score, None);
        assert_eq!(results[2].points, None);
    }

    #[test]
    fn test_resolve_series_week() {
        let week = week(1, 1);
        let predictions = vec![
            SeriesPrediction { week_id: 1, predictor_id: 1, target_id: 2, predicted_series: 540 },
            SeriesPrediction { week_id: 1, predictor_id: 1, target_id: 3, predicted_series: 500 },
        ];
        let series = vec![WeeklySeries {
            week_id: 1,
            bowler_id: 2,
            week_number: 1,
            game_scores: vec![180, 190, 200],
            series_total: 570,
            games_entered: 3,
        }];

        let results = resolve_series_week(&week, &predictions, &series);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].slot, PredictionSlot::Series);
        assert_eq!(results[0].difference, Some(30));
        assert_eq!(results[0].points, Some(3));
        assert_eq!(results[1].points, None);
    }
}
