pub mod handicap;
pub mod predictions;
pub mod stats;
pub mod types;

pub use handicap::{calculate_average, calculate_handicap, handicap_score, series_with_handicap};
pub use predictions::{leaderboard, points_for_difference, resolve_results, weekly_leaderboard, weekly_winners};
pub use types::{GameNumber, LeaderboardEntry, PredictionResult, PredictionSlot, SeriesTotals};
