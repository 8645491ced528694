//! Log Relay
//!
//! An in-process interceptor for a multi-worker host: it counts selected
//! host events in a lock-free shared counter block, persists that block
//! across restarts, and forwards every event to a remote NDJSON ingestion
//! endpoint.
//!
//! # Modules
//!
//! - `counters`: shared atomic counters, segment attach, classification policy
//! - `snapshot`: binary snapshot codec and load/dump persistence
//! - `forwarder`: payload builder, HTTP transport, reentrancy-guarded hook
//! - `hooks`: ordered event and startup callback chains
//! - `query`: operator row view and reset
//! - `api`: admin HTTP endpoints
//! - `interceptor`: per-worker lifecycle wiring
//! - `config`: environment-driven configuration
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use log_relay::{
//!     EventPipeline, HttpTransport, Interceptor, RelayConfig, SegmentRegistry, ShutdownReason,
//!     StartupChain,
//! };
//! use log_relay::types::Event;
//!
//! let config = RelayConfig::from_env().unwrap();
//! let transport = Arc::new(HttpTransport::new(config.timeout).unwrap());
//! let interceptor = Interceptor::start(
//!     &config,
//!     SegmentRegistry::global(),
//!     &StartupChain::new(),
//!     Arc::new(EventPipeline::new()),
//!     transport,
//! );
//! interceptor.pipeline().emit(&Event::error("canceling statement due to user request"));
//! interceptor.shutdown(ShutdownReason::Clean);
//! ```

pub mod api;
pub mod config;
pub mod counters;
pub mod forwarder;
pub mod hooks;
pub mod interceptor;
pub mod query;
pub mod snapshot;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::RelayConfig;
pub use counters::{CounterStore, SegmentRegistry};
pub use forwarder::{EventForwarder, HttpTransport, Transport};
pub use hooks::{EventPipeline, StartupChain};
pub use interceptor::Interceptor;
pub use query::{CounterQuery, CounterRow};
pub use snapshot::{PersistenceManager, ShutdownReason};
pub use types::{CounterId, CounterValues, Event, RelayResult, Severity};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
