use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::scoring::types::{BowlerId, GameNumber, Score, WeekId};

/// League member. The PIN is stored as entered; nothing authenticates against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bowler {
    pub id: BowlerId,
    pub name: String,
    pub nickname: Option<String>,
    pub pin_code: Option<String>,
    pub avatar_color: String,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Week {
    pub id: WeekId,
    pub week_number: i32,
    pub bowling_date: Option<NaiveDate>,
    pub is_complete: bool,
    pub predictions_locked: bool,
    pub created_at: Option<NaiveDateTime>,
}

/// One game slot for one bowler in one week. `score` is `None` until entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameScore {
    pub week_id: WeekId,
    pub bowler_id: BowlerId,
    pub game_number: GameNumber,
    pub score: Option<Score>,
}

/// Per-game prediction, unique per (week, predictor, target, game).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub week_id: WeekId,
    pub predictor_id: BowlerId,
    pub target_id: BowlerId,
    pub game_number: GameNumber,
    pub predicted_score: Score,
}

/// Older single-number form: a guess at the target's whole series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPrediction {
    pub week_id: WeekId,
    pub predictor_id: BowlerId,
    pub target_id: BowlerId,
    pub predicted_series: Score,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySeries {
    pub week_id: WeekId,
    pub bowler_id: BowlerId,
    pub week_number: i32,
    pub game_scores: Vec<Score>,
    pub series_total: Score,
    pub games_entered: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlerStats {
    pub bowler_id: BowlerId,
    pub total_games: usize,
    pub average: f64,
    pub handicap: i32,
    pub high_game: Score,
    pub low_game: Score,
    pub total_pins: i64,
}

impl BowlerStats {
    pub fn empty(bowler_id: BowlerId) -> Self {
        Self {
            bowler_id,
            total_games: 0,
            average: 0.0,
            handicap: 0,
            high_game: 0,
            low_game: 0,
            total_pins: 0,
        }
    }
}
