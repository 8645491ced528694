//! Counter endpoints - read and reset the shared counters

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::info;

use super::ApiResponse;
use crate::api::state::AppState;

/// GET /api/counters - Current counter row
pub async fn get_counters(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::new(state.query.get_snapshot()))
}

/// POST /api/counters/reset - Zero every counter
pub async fn reset_counters(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.query.reset();
    info!("counters reset by operator");
    StatusCode::NO_CONTENT
}
