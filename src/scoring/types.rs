use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type BowlerId = i32;
pub type WeekId = i32;
pub type Score = i32;
pub type Points = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum GameNumber {
    First = 1,
    Second = 2,
    Third = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("game number must be 1, 2 or 3 (got {0})")]
pub struct InvalidGameNumber(pub i32);

impl GameNumber {
    pub const ALL: [GameNumber; 3] = [GameNumber::First, GameNumber::Second, GameNumber::Third];

    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for GameNumber {
    type Error = InvalidGameNumber;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(GameNumber::First),
            2 => Ok(GameNumber::Second),
            3 => Ok(GameNumber::Third),
            other => Err(InvalidGameNumber(other)),
        }
    }
}

impl From<GameNumber> for i32 {
    fn from(game: GameNumber) -> Self {
        game.as_i32()
    }
}

impl std::fmt::Display for GameNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}

/// What a prediction is about: one game, or the legacy three-game series total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionSlot {
    Game(GameNumber),
    Series,
}

impl PredictionSlot {
    pub fn game_number(&self) -> Option<GameNumber> {
        match self {
            PredictionSlot::Game(game) => Some(*game),
            PredictionSlot::Series => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            PredictionSlot::Game(game) => format!("game {}", game),
            PredictionSlot::Series => "series".to_string(),
        }
    }
}

/// A prediction waiting to be matched against an actual result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingPrediction {
    pub predictor_id: BowlerId,
    pub target_id: BowlerId,
    pub predicted: Score,
}

/// The value a bowler actually rolled for the slot being predicted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActualScore {
    pub bowler_id: BowlerId,
    pub value: Score,
}

/// Outcome of matching one prediction. `difference` and `points` are both
/// `Some` exactly when `actual` is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPrediction {
    pub predictor_id: BowlerId,
    pub target_id: BowlerId,
    pub predicted: Score,
    pub actual: Option<Score>,
    pub difference: Option<u32>,
    pub points: Option<Points>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predictor_id: BowlerId,
    pub target_id: BowlerId,
    pub week_id: WeekId,
    pub week_number: i32,
    pub slot: PredictionSlot,
    pub predicted_score: Score,
    pub actual_score: Option<Score>,
    pub difference: Option<u32>,
    pub points: Option<Points>,
}

impl PredictionResult {
    pub fn is_resolved(&self) -> bool {
        self.points.is_some()
    }

    pub fn is_exact(&self) -> bool {
        self.difference == Some(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub bowler_id: BowlerId,
    pub total_points: Points,
    pub avg_difference: f64,
    pub predictions_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesTotals {
    pub scratch: Score,
    pub with_handicap: Score,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_number_conversion() {
        assert_eq!(GameNumber::try_from(2), Ok(GameNumber::Second));
        assert_eq!(GameNumber::try_from(0), Err(InvalidGameNumber(0)));
        assert_eq!(GameNumber::try_from(4), Err(InvalidGameNumber(4)));
        assert_eq!(i32::from(GameNumber::Third), 3);
    }

    #[test]
    fn test_game_number_serializes_as_integer() {
        let json = serde_json::to_string(&GameNumber::First).unwrap();
        assert_eq!(json, "1");

        let parsed: GameNumber = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, GameNumber::Third);
        assert!(serde_json::from_str::<GameNumber>("7").is_err());
    }

    #[test]
    fn test_slot_labels() {
        assert_eq!(PredictionSlot::Game(GameNumber::Second).label(), "game 2");
        assert_eq!(PredictionSlot::Series.label(), "series");
        assert_eq!(PredictionSlot::Series.game_number(), None);
    }
}
