//! REST API module for HTTP endpoints
//!
//! - `GET /api/counters` - Current counter row
//! - `POST /api/counters/reset` - Zero every counter
//! - `POST /api/events` - Emit a host event through the pipeline

pub mod counters;
pub mod events;

use serde::Serialize;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "INTERNAL_ERROR".to_string(),
        }
    }
}
