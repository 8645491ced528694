//! Ordered event-hook chain with per-thread recursion tracking
//!
//! The host emits every log/error event through an `EventPipeline`. Hooks
//! run in registration order, so a hook registered later always sees the
//! event after everything registered before it.
//!
//! A hook may itself raise an event through `EmitContext::report`, which
//! re-enters the pipeline on the same thread one level deeper. Hooks that
//! perform side effects which can fail must check
//! `EmitContext::in_recursion_trouble` first and bail out, otherwise a
//! failing hook would feed itself forever.

use std::cell::Cell;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::error;

use crate::types::Event;

/// Emission depth above which events are dropped outright
pub const MAX_EMIT_DEPTH: usize = 5;

thread_local! {
    static EMIT_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Restores the thread's emission depth when an emit call unwinds
struct DepthGuard {
    depth: usize,
}

impl DepthGuard {
    fn enter() -> Self {
        let depth = EMIT_DEPTH.with(|d| {
            let next = d.get() + 1;
            d.set(next);
            next
        });
        Self { depth }
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        EMIT_DEPTH.with(|d| d.set(self.depth - 1));
    }
}

/// A handler invoked for every emitted event
pub trait EventHook: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Handle one event
    fn on_event(&self, event: &Event, ctx: &EmitContext<'_>);
}

/// What a hook knows about the emission it is running in
pub struct EmitContext<'a> {
    pipeline: &'a EventPipeline,
    depth: usize,
}

impl<'a> EmitContext<'a> {
    pub fn new(pipeline: &'a EventPipeline, depth: usize) -> Self {
        Self { pipeline, depth }
    }

    /// Nesting level of the current emission (1 for a top-level event)
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// `true` when this event was raised while handling another event
    pub fn in_recursion_trouble(&self) -> bool {
        self.depth > 1
    }

    /// Raise a new event through the same pipeline
    pub fn report(&self, event: Event) {
        self.pipeline.emit(&event);
    }
}

/// Ordered list of event hooks
#[derive(Default)]
pub struct EventPipeline {
    hooks: RwLock<Vec<Arc<dyn EventHook>>>,
}

impl EventPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook; it runs after every hook registered before it
    pub fn register(&self, hook: Arc<dyn EventHook>) -> &Self {
        self.hooks.write().push(hook);
        self
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.read().len()
    }

    /// Names of registered hooks in execution order
    pub fn hook_names(&self) -> Vec<String> {
        self.hooks.read().iter().map(|h| h.name().to_string()).collect()
    }

    /// Run every hook for `event`
    pub fn emit(&self, event: &Event) {
        let guard = DepthGuard::enter();
        if guard.depth > MAX_EMIT_DEPTH {
            error!(depth = guard.depth, "event emission nested too deeply, dropping event");
            return;
        }

        // Clone the list so hooks may report or register without holding the lock
        let hooks: Vec<Arc<dyn EventHook>> = self.hooks.read().clone();
        let ctx = EmitContext::new(self, guard.depth);
        for hook in hooks {
            hook.on_event(event, &ctx);
        }
    }
}

/// Current emission depth on this thread (0 outside any emit)
pub fn current_depth() -> usize {
    EMIT_DEPTH.with(|d| d.get())
}
