use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::handicap::{calculate_average, calculate_handicap_with};
use super::types::{BowlerId, Score, WeekId};
use crate::config::settings::HandicapSettings;
use crate::domain::{BowlerStats, GameScore, Week, WeeklySeries};

/// Builds one series per (bowler, week) that has at least one entered score.
/// Games pointing at an unknown week are ignored.
pub fn weekly_series(games: &[GameScore], weeks: &[Week]) -> Vec<WeeklySeries> {
    let week_numbers: HashMap<WeekId, i32> = weeks.iter().map(|w| (w.id, w.week_number)).collect();

    let mut grouped: BTreeMap<(i32, BowlerId, WeekId), Vec<&GameScore>> = BTreeMap::new();
    for game in games.iter().filter(|g| g.score.is_some()) {
        let Some(&week_number) = week_numbers.get(&game.week_id) else {
            continue;
        };
        grouped
            .entry((week_number, game.bowler_id, game.week_id))
            .or_default()
            .push(game);
    }

    grouped
        .into_iter()
        .map(|((week_number, bowler_id, week_id), mut week_games)| {
            week_games.sort_by_key(|g| g.game_number);
            let game_scores: Vec<Score> = week_games.iter().filter_map(|g| g.score).collect();

            WeeklySeries {
                week_id,
                bowler_id,
                week_number,
                series_total: game_scores.iter().sum(),
                games_entered: game_scores.len(),
                game_scores,
            }
        })
        .collect()
}

/// All-time stats for one bowler. A bowler with no entered games gets the
/// empty record: average 0 and no handicap until there is something to
/// average.
pub fn bowler_stats(bowler_id: BowlerId, games: &[GameScore], settings: &HandicapSettings) -> BowlerStats {
    let scores: Vec<Score> = games
        .iter()
        .filter(|g| g.bowler_id == bowler_id)
        .filter_map(|g| g.score)
        .collect();

    stats_from_scores(bowler_id, &scores, settings)
}

/// Stats for every bowler that has at least one entered game, highest
/// average first. Equal averages fall back to bowler id.
pub fn all_bowler_stats(games: &[GameScore], settings: &HandicapSettings) -> Vec<BowlerStats> {
    let mut by_bowler: BTreeMap<BowlerId, Vec<Score>> = BTreeMap::new();
    for game in games {
        if let Some(score) = game.score {
            by_bowler.entry(game.bowler_id).or_default().push(score);
        }
    }

    let mut stats: Vec<BowlerStats> = by_bowler
        .into_iter()
        .map(|(bowler_id, scores)| stats_from_scores(bowler_id, &scores, settings))
        .collect();

    stats.sort_by(|a, b| {
        b.average
            .total_cmp(&a.average)
            .then_with(|| a.bowler_id.cmp(&b.bowler_id))
    });
    stats
}

fn stats_from_scores(bowler_id: BowlerId, scores: &[Score], settings: &HandicapSettings) -> BowlerStats {
    let (Some(&high_game), Some(&low_game)) = (scores.iter().max(), scores.iter().min()) else {
        return BowlerStats::empty(bowler_id);
    };

    let average = calculate_average(scores);
    BowlerStats {
        bowler_id,
        total_games: scores.len(),
        average,
        handicap: calculate_handicap_with(average, settings),
        high_game,
        low_game,
        total_pins: scores.iter().map(|&s| s as i64).sum(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub week_number: i32,
    pub average: f64,
    pub handicap: i32,
}

/// Running average and handicap after each week the bowler has scores in.
pub fn handicap_trend(
    bowler_id: BowlerId,
    games: &[GameScore],
    weeks: &[Week],
    settings: &HandicapSettings,
) -> Vec<TrendPoint> {
    let bowler_games: Vec<GameScore> = games
        .iter()
        .filter(|g| g.bowler_id == bowler_id)
        .cloned()
        .collect();

    let mut running: Vec<Score> = Vec::new();
    weekly_series(&bowler_games, weeks)
        .into_iter()
        .map(|series| {
            running.extend(&series.game_scores);
            let average = calculate_average(&running);
            TrendPoint {
                week_number: series.week_number,
                average,
                handicap: calculate_handicap_with(average, settings),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalBest {
    pub bowler_id: BowlerId,
    pub high_game: Option<Score>,
    pub high_series: Option<Score>,
}

pub fn personal_bests(
    bowler_ids: &[BowlerId],
    stats: &[BowlerStats],
    series: &[WeeklySeries],
) -> Vec<PersonalBest> {
    bowler_ids
        .iter()
        .map(|&bowler_id| PersonalBest {
            bowler_id,
            high_game: stats
                .iter()
                .find(|s| s.bowler_id == bowler_id && s.total_games > 0)
                .map(|s| s.high_game),
            high_series: series
                .iter()
                .filter(|s| s.bowler_id == bowler_id)
                .map(|s| s.series_total)
                .max(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub team_average: f64,
    pub team_high_game: Score,
    pub total_games: usize,
    pub total_pins: i64,
}

pub fn team_summary(stats: &[BowlerStats]) -> Option<TeamSummary> {
    if stats.is_empty() {
        return None;
    }

    let average_sum: f64 = stats.iter().map(|s| s.average).sum();
    Some(TeamSummary {
        team_average: average_sum / stats.len() as f64,
        team_high_game: stats.iter().map(|s| s.high_game).max().unwrap_or(0),
        total_games: stats.iter().map(|s| s.total_games).sum(),
        total_pins: stats.iter().map(|s| s.total_pins).sum(),
    })
}

const DISTRIBUTION_BUCKETS: [(&str, Score, Score); 9] = [
    ("<120", 0, 119),
    ("120-139", 120, 139),
    ("140-159", 140, 159),
    ("160-179", 160, 179),
    ("180-199", 180, 199),
    ("200-219", 200, 219),
    ("220-239", 220, 239),
    ("240-259", 240, 259),
    ("260+", 260, 300),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionBucket {
    pub label: String,
    pub min: Score,
    pub max: Score,
    pub count: usize,
}

pub fn score_distribution(scores: &[Score]) -> Vec<DistributionBucket> {
    DISTRIBUTION_BUCKETS
        .iter()
        .map(|&(label, min, max)| DistributionBucket {
            label: label.to_string(),
            min,
            max,
            count: scores.iter().filter(|&&s| s >= min && s <= max).count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::types::GameNumber;

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

    fn game(week_id: WeekId, bowler_id: BowlerId, game_number: GameNumber, score: Option<Score>) -> GameScore {
        GameScore {
            week_id,
            bowler_id,
            game_number,
            score,
        }
    }

    fn sample_games() -> Vec<GameScore> {
        vec![
            game(10, 1, GameNumber::Third, Some(170)),
            game(10, 1, GameNumber::First, Some(150)),
            game(10, 1, GameNumber::Second, Some(160)),
            game(20, 1, GameNumber::First, Some(200)),
            game(20, 1, GameNumber::Second, None),
            game(10, 2, GameNumber::First, Some(230)),
            game(20, 2, GameNumber::First, None),
        ]
    }

    #[test]
    fn test_weekly_series_orders_by_game_number() {
        let weeks = vec![week(10, 1), week(20, 2)];
        let series = weekly_series(&sample_games(), &weeks);

        assert_eq!(series.len(), 3);
        assert_eq!(series[0].bowler_id, 1);
        assert_eq!(series[0].game_scores, vec![150, 160, 170]);
        assert_eq!(series[0].series_total, 480);
        assert_eq!(series[0].games_entered, 3);

        assert_eq!(series[1].bowler_id, 2);
        assert_eq!(series[1].week_number, 1);

        assert_eq!(series[2].week_number, 2);
        assert_eq!(series[2].game_scores, vec![200]);
        assert_eq!(series[2].games_entered, 1);
    }

    #[test]
    fn test_weekly_series_ignores_unknown_weeks() {
        let series = weekly_series(&sample_games(), &[week(10, 1)]);
        assert!(series.iter().all(|s| s.week_id == 10));
    }

    #[test]
    fn test_bowler_stats() {
        let stats = bowler_stats(1, &sample_games(), &HandicapSettings::default());

        assert_eq!(stats.total_games, 4);
        assert_eq!(stats.average, 170.0);
        assert_eq!(stats.handicap, 45);
        assert_eq!(stats.high_game, 200);
        assert_eq!(stats.low_game, 150);
        assert_eq!(stats.total_pins, 680);
    }

    #[test]
    fn test_bowler_without_games_has_empty_stats() {
        let stats = bowler_stats(42, &sample_games(), &HandicapSettings::default());
        assert_eq!(stats, BowlerStats::empty(42));
        assert_eq!(stats.average, 0.0);
        assert_eq!(stats.handicap, 0);
    }

    #[test]
    fn test_all_bowler_stats_skips_bowlers_without_scores() {
        let mut games = sample_games();
        games.push(game(10, 3, GameNumber::First, None));

        let stats = all_bowler_stats(&games, &HandicapSettings::default());

        let ids: Vec<BowlerId> = stats.iter().map(|s| s.bowler_id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(stats[0].handicap, 0);
    }

    #[test]
    fn test_all_bowler_stats_ranked_by_average() {
        let games = vec![
            game(10, 5, GameNumber::First, Some(150)),
            game(10, 3, GameNumber::First, Some(190)),
            game(10, 4, GameNumber::First, Some(150)),
            game(10, 7, GameNumber::First, Some(210)),
        ];

        let stats = all_bowler_stats(&games, &HandicapSettings::default());

        let ids: Vec<BowlerId> = stats.iter().map(|s| s.bowler_id).collect();
        assert_eq!(ids, vec![7, 3, 4, 5]);
    }

    #[test]
    fn test_handicap_trend_is_cumulative() {
        let weeks = vec![week(10, 1), week(20, 2)];
        let trend = handicap_trend(1, &sample_games(), &weeks, &HandicapSettings::default());

        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].week_number, 1);
        assert_eq!(trend[0].average, 160.0);
        assert_eq!(trend[0].handicap, 54);
        assert_eq!(trend[1].average, 170.0);
        assert_eq!(trend[1].handicap, 45);
    }

    #[test]
    fn test_personal_bests() {
        let weeks = vec![week(10, 1), week(20, 2)];
        let games = sample_games();
        let settings = HandicapSettings::default();
        let stats = all_bowler_stats(&games, &settings);
        let series = weekly_series(&games, &weeks);

        let bests = personal_bests(&[1, 2, 3], &stats, &series);

        assert_eq!(bests[0].high_game, Some(200));
        assert_eq!(bests[0].high_series, Some(480));
        assert_eq!(bests[1].high_series, Some(230));
        assert_eq!(bests[2].high_game, None);
        assert_eq!(bests[2].high_series, None);
    }

    #[test]
    fn test_team_summary() {
        assert_eq!(team_summary(&[]), None);

        let stats = all_bowler_stats(&sample_games(), &HandicapSettings::default());
        let summary = team_summary(&stats).unwrap();

        assert_eq!(summary.team_average, 200.0);
        assert_eq!(summary.team_high_game, 230);
        assert_eq!(summary.total_games, 5);
        assert_eq!(summary.total_pins, 910);
    }

    #[test]
    fn test_score_distribution_buckets() {
        let buckets = score_distribution(&[0, 119, 120, 199, 200, 259, 260, 300]);

        let counts: Vec<usize> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1, 0, 0, 1, 1, 0, 1, 2]);
        assert_eq!(buckets[0].label, "<120");
        assert_eq!(buckets[8].label, "260+");
    }
}
