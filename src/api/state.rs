//! Shared state for the admin HTTP API

use std::sync::Arc;

use crate::hooks::EventPipeline;
use crate::query::CounterQuery;

/// State handed to every request handler
pub struct AppState {
    pub query: CounterQuery,
    /// Pipeline that ingested events are emitted through
    pub pipeline: Arc<EventPipeline>,
}

impl AppState {
    pub fn new(query: CounterQuery, pipeline: Arc<EventPipeline>) -> Self {
        Self { query, pipeline }
    }
}
