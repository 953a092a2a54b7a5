use anyhow::Context as _;
use thiserror::Error;

use crate::scoring::types::BowlerId;

#[derive(Debug, Error)]
pub enum LeagueError {
    #[error("Invalid {field} for {subject}: {value} (must be between {min} and {max})")]
    Validation {
        field: String,
        subject: String,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("Predictions for week {week_number} are locked")]
    WeekLocked { week_number: i32 },

    #[error("Bowler {bowler_id} cannot predict their own score")]
    SelfPrediction { bowler_id: BowlerId },

    #[error("Storage failure")]
    Storage(#[source] anyhow::Error),
}

impl LeagueError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        LeagueError::NotFound { entity, id }
    }

    pub fn is_client_error(&self) -> bool {
        !matches!(self, LeagueError::Storage(_))
    }
}

/// Add context to storage errors
pub fn storage_context(operation: &str, entity: &str) -> String {
    format!("Failed to {} {}", operation, entity)
}

/// Wrap result with storage context
pub fn with_storage_context<T, E>(result: Result<T, E>, operation: &str, entity: &str) -> anyhow::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    result.context(storage_context(operation, entity))
}
