//! Hook that writes every event to the process log

use tracing::{debug, error, info, warn};

use crate::types::{Event, Severity};

use super::pipeline::{EmitContext, EventHook};

/// Mirrors host events into `tracing` output
#[derive(Debug, Default)]
pub struct LogSink;

impl EventHook for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    fn on_event(&self, event: &Event, ctx: &EmitContext<'_>) {
        let code = event.code.as_deref().unwrap_or("-");
        let depth = ctx.depth();
        match event.severity {
            Severity::Debug => debug!(code, depth, "{}", event.message),
            Severity::Log | Severity::Info | Severity::Notice => info!(code, depth, "{}", event.message),
            Severity::Warning => warn!(code, depth, "{}", event.message),
            Severity::Error | Severity::Fatal | Severity::Panic => error!(code, depth, "{}", event.message),
        }
    }
}
