use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{error_response, AppState, SeriesParams};
use crate::api::models::{
    into_items, LeaderboardItem, PredictionResultItem, SeriesItem, SeriesTotalsItem, WeekItem,
};

pub async fn get_weeks(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.league.weeks() {
        Ok(weeks) => Json(into_items::<_, WeekItem>(weeks)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_weekly_series(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SeriesParams>,
) -> impl IntoResponse {
    if let Some(week_id) = params.week_id {
        if let Err(e) = state.league.week(week_id) {
            return error_response(e);
        }
    }

    match state.league.weekly_series(params.week_id) {
        Ok(series) => Json(into_items::<_, SeriesItem>(series)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_bowler_series(
    State(state): State<Arc<AppState>>,
    Path((week_id, bowler_id)): Path<(i32, i32)>,
) -> impl IntoResponse {
    if let Err(e) = state.league.week(week_id).and_then(|_| state.league.bowler(bowler_id)) {
        return error_response(e);
    }

    match state.league.series_with_handicap(week_id, bowler_id) {
        Ok(totals) => Json(SeriesTotalsItem::from(totals)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_week_results(
    State(state): State<Arc<AppState>>,
    Path(week_id): Path<i32>,
) -> impl IntoResponse {
    match state.league.week_results(week_id) {
        Ok(results) => Json(into_items::<_, PredictionResultItem>(results)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_weekly_leaderboard(
    State(state): State<Arc<AppState>>,
    Path(week_id): Path<i32>,
) -> impl IntoResponse {
    let entries = match state.league.weekly_leaderboard(week_id) {
        Ok(entries) => entries,
        Err(e) => return error_response(e),
    };

    match state.league.bowlers() {
        Ok(bowlers) => Json(LeaderboardItem::ranked(entries, &bowlers)).into_response(),
        Err(e) => error_response(e),
    }
}
