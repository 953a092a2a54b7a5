use super::types::{Score, SeriesTotals};
use crate::config::settings::HandicapSettings;

/// Arithmetic mean of the given scores, or 0 when there are none.
pub fn calculate_average(scores: &[Score]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let total: i64 = scores.iter().map(|&s| s as i64).sum();
    total as f64 / scores.len() as f64
}

/// League handicap: 90% of the gap between the average and 220.
///
/// Ties at .5 round up (180.5 -> 36, 165 -> 49.5 -> 50). Averages at or
/// above the base get no handicap.
pub fn calculate_handicap(average: f64) -> i32 {
    calculate_handicap_with(average, &HandicapSettings::default())
}

pub fn calculate_handicap_with(average: f64, settings: &HandicapSettings) -> i32 {
    if average >= settings.base {
        return 0;
    }
    round_half_up((settings.base - average) * settings.percentage).max(0)
}

// `f64::round` rounds half away from zero, which is half-up for the
// non-negative gaps we feed it.
fn round_half_up(value: f64) -> i32 {
    value.round() as i32
}

pub fn handicap_score(scratch: Score, handicap: i32) -> Score {
    scratch + handicap
}

/// Handicap is added once per game bowled, so a partial series only
/// collects it for the games actually entered.
pub fn series_with_handicap(game_scores: &[Score], handicap: i32) -> SeriesTotals {
    let scratch: Score = game_scores.iter().sum();
    let games = game_scores.len() as i32;

    SeriesTotals {
        scratch,
        with_handicap: scratch + handicap * games,
    }
}
