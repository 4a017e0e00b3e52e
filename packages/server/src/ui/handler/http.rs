//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{domain::Matchboard, infrastructure::dto::http::ServiceStatsDto};

use super::super::state::AppState;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get current service statistics
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ServiceStatsDto> {
    let stats = state.get_stats_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(ServiceStatsDto {
        online: stats.online,
        waiting: stats.waiting,
        sessions: stats.sessions,
    })
}

/// Debug endpoint to get the full matchboard state (for testing purposes)
pub async fn debug_matchboard(State(state): State<Arc<AppState>>) -> Json<Matchboard> {
    let board = state.get_stats_usecase.snapshot().await;
    Json(board)
}
