use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{error_response, AppState, StatsParams};
use crate::api::models::{into_items, BowlerItem, BowlerStatsItem, TrendPointItem};

pub async fn get_bowlers(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.league.bowlers() {
        Ok(bowlers) => Json(into_items::<_, BowlerItem>(bowlers)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_bowler_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatsParams>,
) -> impl IntoResponse {
    if let Some(bowler_id) = params.bowler_id {
        if let Err(e) = state.league.bowler(bowler_id) {
            return error_response(e);
        }
    }

    match state.league.bowler_stats(params.bowler_id) {
        Ok(stats) => Json(into_items::<_, BowlerStatsItem>(stats)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_handicap_trend(
    State(state): State<Arc<AppState>>,
    Path(bowler_id): Path<i32>,
) -> impl IntoResponse {
    if let Err(e) = state.league.bowler(bowler_id) {
        return error_response(e);
    }

    match state.league.handicap_trend(bowler_id) {
        Ok(trend) => Json(into_items::<_, TrendPointItem>(trend)).into_response(),
        Err(e) => error_response(e),
    }
}
