//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::rest::{counters, events};
use super::state::AppState;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/counters", get(counters::get_counters))
        .route("/api/counters/reset", post(counters::reset_counters))
        .route("/api/events", post(events::ingest_event))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
