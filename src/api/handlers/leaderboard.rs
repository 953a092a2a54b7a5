use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{error_response, AppState};
use crate::api::models::{into_items, LeaderboardItem, TeamResponse, WeeklyWinnerItem};

pub async fn get_leaderboard(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let entries = match state.league.leaderboard() {
        Ok(entries) => entries,
        Err(e) => return error_response(e),
    };

    match state.league.bowlers() {
        Ok(bowlers) => Json(LeaderboardItem::ranked(entries, &bowlers)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_weekly_winners(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let winners = match state.league.weekly_winners() {
        Ok(winners) => winners,
        Err(e) => return error_response(e),
    };

    match state.league.bowlers() {
        Ok(bowlers) => Json(WeeklyWinnerItem::named(winners, &bowlers)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_team(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let team = state.league.team_summary().and_then(|summary| {
        let personal_bests = state.league.personal_bests()?;
        let distribution = state.league.score_distribution(None)?;
        Ok(TeamResponse {
            summary: summary.map(Into::into),
            personal_bests: into_items(personal_bests),
            distribution: into_items(distribution),
        })
    });

    match team {
        Ok(team) => Json(team).into_response(),
        Err(e) => error_response(e),
    }
}
