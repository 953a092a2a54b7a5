pub mod models;
pub mod validation;
pub mod week;

pub use models::{Bowler, BowlerStats, GameScore, Prediction, SeriesPrediction, Week, WeeklySeries};
pub use week::WeekStatus;
