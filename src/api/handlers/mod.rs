use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::error;
use serde::Deserialize;

use crate::api::models::ErrorResponse;
use crate::errors::LeagueError;
use crate::services::league::LeagueService;

pub mod bowlers;
pub mod leaderboard;
pub mod weeks;

pub struct AppState {
    pub league: LeagueService,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsParams {
    pub bowler_id: Option<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesParams {
    pub week_id: Option<i32>,
}

/// Maps service failures onto HTTP statuses. Storage details stay in the log.
pub fn error_response(err: anyhow::Error) -> Response {
    let (status, message) = match err.downcast_ref::<LeagueError>() {
        Some(e @ LeagueError::NotFound { .. }) => (StatusCode::NOT_FOUND, e.to_string()),
        Some(e @ LeagueError::WeekLocked { .. }) => (StatusCode::CONFLICT, e.to_string()),
        Some(e) if e.is_client_error() => (StatusCode::BAD_REQUEST, e.to_string()),
        _ => {
            error!("Request failed: {:#}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal storage error".to_string(),
            )
        }
    };

    (status, Json(ErrorResponse { error: message })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn status_and_message(err: LeagueError) -> (StatusCode, String) {
        let response = error_response(err.into());
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        (status, body["error"].as_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_storage_failure_hides_details() {
        let err = LeagueError::Storage(anyhow::anyhow!("database is locked at /srv/league.db"));
        let (status, message) = status_and_message(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Internal storage error");
    }

    #[tokio::test]
    async fn test_validation_is_bad_request() {
        let err = LeagueError::Validation {
            field: "score".to_string(),
            subject: "bowler 2 game 1".to_string(),
            value: 301,
            min: 0,
            max: 300,
        };
        let (status, message) = status_and_message(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(message.contains("301"));
    }

    #[tokio::test]
    async fn test_locked_week_is_conflict() {
        let (status, message) = status_and_message(LeagueError::WeekLocked { week_number: 4 }).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(message, "Predictions for week 4 are locked");
    }

    #[tokio::test]
    async fn test_self_prediction_is_bad_request() {
        let (status, _) = status_and_message(LeagueError::SelfPrediction { bowler_id: 1 }).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_untyped_errors_are_internal() {
        let response = error_response(anyhow::anyhow!("pool timed out"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
