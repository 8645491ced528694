//! Data types shared across the relay
//!
//! This module contains the event record handed to hooks and the plain
//! counter types used by the store, the snapshot codec and the query API.

mod counter;
mod event;

pub use counter::{CounterId, CounterValues, ParseError};
pub use event::{Event, Severity};

/// Result type for binary-level operations
pub type RelayResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;
