use axum::{routing::get, Router};
use std::sync::Arc;

use crate::api::handlers::{
    bowlers::{get_bowler_stats, get_bowlers, get_handicap_trend},
    leaderboard::{get_leaderboard, get_team, get_weekly_winners},
    weeks::{get_bowler_series, get_week_results, get_weekly_leaderboard, get_weekly_series, get_weeks},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/bowlers", get(get_bowlers))
        .route("/api/bowlers/:bowler_id/trend", get(get_handicap_trend))
        .route("/api/weeks", get(get_weeks))
        .route("/api/weeks/:week_id/results", get(get_week_results))
        .route("/api/weeks/:week_id/leaderboard", get(get_weekly_leaderboard))
        .route("/api/weeks/:week_id/bowlers/:bowler_id/series", get(get_bowler_series))
        .route("/api/stats", get(get_bowler_stats))
        .route("/api/series", get(get_weekly_series))
        .route("/api/leaderboard", get(get_leaderboard))
        .route("/api/leaderboard/winners", get(get_weekly_winners))
        .route("/api/team", get(get_team))
        .with_state(state)
}
