use serde::Serialize;

use crate::domain::{Bowler, BowlerStats, Week, WeeklySeries};
use crate::scoring::stats::{DistributionBucket, PersonalBest, TeamSummary, TrendPoint};
use crate::scoring::types::{LeaderboardEntry, PredictionResult, SeriesTotals};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BowlerItem {
    pub id: i32,
    pub name: String,
    pub nickname: Option<String>,
    pub avatar_color: String,
}

impl From<Bowler> for BowlerItem {
    fn from(bowler: Bowler) -> Self {
        Self {
            id: bowler.id,
            name: bowler.name,
            nickname: bowler.nickname,
            avatar_color: bowler.avatar_color,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekItem {
    pub id: i32,
    pub week_number: i32,
    pub bowling_date: Option<String>,
    pub status: String,
    pub is_complete: bool,
    pub predictions_locked: bool,
}

impl From<Week> for WeekItem {
    fn from(week: Week) -> Self {
        Self {
            id: week.id,
            week_number: week.week_number,
            bowling_date: week.bowling_date.map(|d| d.to_string()),
            status: week.status().as_str().to_string(),
            is_complete: week.is_complete,
            predictions_locked: week.predictions_locked,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BowlerStatsItem {
    pub bowler_id: i32,
    pub total_games: usize,
    pub average: f64,
    pub handicap: i32,
    pub high_game: i32,
    pub low_game: i32,
    pub total_pins: i64,
}

impl From<BowlerStats> for BowlerStatsItem {
    fn from(stats: BowlerStats) -> Self {
        Self {
            bowler_id: stats.bowler_id,
            total_games: stats.total_games,
            average: stats.average,
            handicap: stats.handicap,
            high_game: stats.high_game,
            low_game: stats.low_game,
            total_pins: stats.total_pins,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesItem {
    pub week_id: i32,
    pub week_number: i32,
    pub bowler_id: i32,
    pub game_scores: Vec<i32>,
    pub series_total: i32,
    pub games_entered: usize,
}

impl From<WeeklySeries> for SeriesItem {
    fn from(series: WeeklySeries) -> Self {
        Self {
            week_id: series.week_id,
            week_number: series.week_number,
            bowler_id: series.bowler_id,
            game_scores: series.game_scores,
            series_total: series.series_total,
            games_entered: series.games_entered,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesTotalsItem {
    pub scratch: i32,
    pub with_handicap: i32,
}

impl From<SeriesTotals> for SeriesTotalsItem {
    fn from(totals: SeriesTotals) -> Self {
        Self {
            scratch: totals.scratch,
            with_handicap: totals.with_handicap,
        }
    }
}

/// `gameNumber` is null for whole-series predictions.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResultItem {
    pub predictor_id: i32,
    pub target_id: i32,
    pub week_number: i32,
    pub slot: String,
    pub game_number: Option<i32>,
    pub predicted_score: i32,
    pub actual_score: Option<i32>,
    pub difference: Option<u32>,
    pub points: Option<i32>,
    pub resolved: bool,
}

impl From<PredictionResult> for PredictionResultItem {
    fn from(result: PredictionResult) -> Self {
        Self {
            predictor_id: result.predictor_id,
            target_id: result.target_id,
            week_number: result.week_number,
            resolved: result.is_resolved(),
            slot: result.slot.label(),
            game_number: result.slot.game_number().map(|g| g.as_i32()),
            predicted_score: result.predicted_score,
            actual_score: result.actual_score,
            difference: result.difference,
            points: result.points,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardItem {
    pub rank: usize,
    pub bowler_id: i32,
    pub name: Option<String>,
    pub total_points: i32,
    pub avg_difference: f64,
    pub predictions_count: usize,
}

impl LeaderboardItem {
    pub fn ranked(entries: Vec<LeaderboardEntry>, bowlers: &[Bowler]) -> Vec<Self> {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| Self {
                rank: i + 1,
                bowler_id: entry.bowler_id,
                name: bowlers
                    .iter()
                    .find(|b| b.id == entry.bowler_id)
                    .map(|b| b.name.clone()),
                total_points: entry.total_points,
                avg_difference: entry.avg_difference,
                predictions_count: entry.predictions_count,
            })
            .collect()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyWinnerItem {
    pub week_number: i32,
    pub bowler_id: i32,
    pub name: Option<String>,
    pub points: i32,
}

impl WeeklyWinnerItem {
    pub fn named(winners: Vec<(i32, LeaderboardEntry)>, bowlers: &[Bowler]) -> Vec<Self> {
        winners
            .into_iter()
            .map(|(week_number, entry)| Self {
                week_number,
                bowler_id: entry.bowler_id,
                name: bowlers
                    .iter()
                    .find(|b| b.id == entry.bowler_id)
                    .map(|b| b.name.clone()),
                points: entry.total_points,
            })
            .collect()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPointItem {
    pub week_number: i32,
    pub average: f64,
    pub handicap: i32,
}

impl From<TrendPoint> for TrendPointItem {
    fn from(point: TrendPoint) -> Self {
        Self {
            week_number: point.week_number,
            average: point.average,
            handicap: point.handicap,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummaryItem {
    pub team_average: f64,
    pub team_high_game: i32,
    pub total_games: usize,
    pub total_pins: i64,
}

impl From<TeamSummary> for TeamSummaryItem {
    fn from(summary: TeamSummary) -> Self {
        Self {
            team_average: summary.team_average,
            team_high_game: summary.team_high_game,
            total_games: summary.total_games,
            total_pins: summary.total_pins,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalBestItem {
    pub bowler_id: i32,
    pub high_game: Option<i32>,
    pub high_series: Option<i32>,
}

impl From<PersonalBest> for PersonalBestItem {
    fn from(best: PersonalBest) -> Self {
        Self {
            bowler_id: best.bowler_id,
            high_game: best.high_game,
            high_series: best.high_series,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionItem {
    pub label: String,
    pub min: i32,
    pub max: i32,
    pub count: usize,
}

impl From<DistributionBucket> for DistributionItem {
    fn from(bucket: DistributionBucket) -> Self {
        Self {
            label: bucket.label,
            min: bucket.min,
            max: bucket.max,
            count: bucket.count,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
    pub summary: Option<TeamSummaryItem>,
    pub personal_bests: Vec<PersonalBestItem>,
    pub distribution: Vec<DistributionItem>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
}

pub fn into_items<T, U: From<T>>(values: Vec<T>) -> Vec<U> {
    values.into_iter().map(U::from).collect()
}
