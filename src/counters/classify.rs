//! Pluggable event classification
//!
//! Deciding which counter an event belongs to is a policy supplied by the
//! deployment. The relay ships two: `NoClassification`, which counts
//! nothing, and `CodeTable`, an explicit error-code lookup table.

use std::collections::HashMap;
use std::sync::Arc;

use crate::hooks::{EmitContext, EventHook};
use crate::types::{CounterId, Event, ParseError};

use super::store::CounterStore;

/// Maps an event to at most one counter
pub trait EventClassifier: Send + Sync {
    fn classify(&self, event: &Event) -> Option<CounterId>;
}

/// Default policy: no event is counted
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClassification;

impl EventClassifier for NoClassification {
    fn classify(&self, _event: &Event) -> Option<CounterId> {
        None
    }
}

/// Explicit error-code to counter table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    entries: HashMap<String, CounterId>,
}

impl CodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a mapping
    pub fn with(mut self, code: impl Into<String>, counter: CounterId) -> Self {
        self.entries.insert(code.into(), counter);
        self
    }

    /// Parse `CODE=counter,CODE=counter` (whitespace around items ignored)
    pub fn parse(spec: &str) -> Result<Self, ParseError> {
        let mut table = Self::new();
        for item in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (code, counter) = item
                .split_once('=')
                .ok_or_else(|| ParseError::MissingSeparator(item.to_string()))?;
            let code = code.trim();
            if code.is_empty() {
                return Err(ParseError::EmptyCode(item.to_string()));
            }
            table = table.with(code, counter.trim().parse()?);
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EventClassifier for CodeTable {
    fn classify(&self, event: &Event) -> Option<CounterId> {
        event
            .code
            .as_deref()
            .and_then(|code| self.entries.get(code).copied())
    }
}

/// Event hook that applies a classifier and bumps the matching counter
pub struct CountingHook {
    store: Arc<CounterStore>,
    classifier: Box<dyn EventClassifier>,
}

impl CountingHook {
    pub fn new(store: Arc<CounterStore>, classifier: Box<dyn EventClassifier>) -> Self {
        Self { store, classifier }
    }
}

impl EventHook for CountingHook {
    fn name(&self) -> &str {
        "counting"
    }

    fn on_event(&self, event: &Event, _ctx: &EmitContext<'_>) {
        if let Some(id) = self.classifier.classify(event) {
            self.store.increment(id);
        }
    }
}
