//! Event forwarding hook
//!
//! Runs inside the host's error-emission path, once per event:
//!
//! 1. bail out if the pipeline is already handling a nested event
//! 2. render the NDJSON payload
//! 3. blocking POST to the ingestion endpoint
//! 4. on transport failure, report a new error event through the same
//!    pipeline; step 1 stops that report from being forwarded again
//!
//! There is no retry, batching or backoff.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::hooks::{EmitContext, EventHook};
use crate::types::Event;

use super::payload::build_payload;
use super::transport::Transport;

/// What happened to one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// Nested emission; no I/O attempted
    Suppressed,
    /// Request completed with this HTTP status (any status counts)
    Delivered { status: u16, truncated: bool },
    /// Transport failure, reported back through the pipeline
    Failed,
}

/// Ships every event to the ingestion endpoint
pub struct EventForwarder {
    endpoint: String,
    service_tag: String,
    transport: Arc<dyn Transport>,
}

impl EventForwarder {
    pub fn new(endpoint: impl Into<String>, service_tag: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: endpoint.into(),
            service_tag: service_tag.into(),
            transport,
        }
    }

    /// Forward one event
    pub fn forward(&self, event: &Event, ctx: &EmitContext<'_>) -> ForwardOutcome {
        if ctx.in_recursion_trouble() {
            trace!(depth = ctx.depth(), "nested event, not forwarding");
            return ForwardOutcome::Suppressed;
        }

        let payload = build_payload(&self.service_tag, &event.message);
        if payload.truncated {
            debug!(len = event.message.len(), "event message truncated to fit payload");
        }

        match self.transport.post(&self.endpoint, payload.body) {
            Ok(status) => {
                trace!(status, "event forwarded");
                ForwardOutcome::Delivered {
                    status,
                    truncated: payload.truncated,
                }
            }
            Err(e) => {
                ctx.report(Event::error(format!("event forwarding failed: {}", e)));
                ForwardOutcome::Failed
            }
        }
    }
}

impl EventHook for EventForwarder {
    fn name(&self) -> &str {
        "forwarder"
    }

    fn on_event(&self, event: &Event, ctx: &EmitContext<'_>) {
        self.forward(event, ctx);
    }
}
