//! Host callback chains
//!
//! - `EventPipeline`: every log/error event, with recursion tracking
//! - `StartupChain`: shared-state initialization callbacks
//! - `LogSink`: writes events to the process log

mod log_sink;
mod pipeline;
mod startup;

pub use log_sink::LogSink;
pub use pipeline::{current_depth, EmitContext, EventHook, EventPipeline, MAX_EMIT_DEPTH};
pub use startup::{StartupChain, StartupHook};
