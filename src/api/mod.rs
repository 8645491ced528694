//! Admin HTTP API
//!
//! Exposes counter snapshots and resets to an operator and accepts host
//! events over HTTP.

pub mod http;
pub mod rest;
pub mod state;

pub use http::create_router;
pub use state::AppState;
