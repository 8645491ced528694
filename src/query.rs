//! Operator-facing counter queries
//!
//! A thin projection of the `CounterStore` into a single row, plus reset.
//! Row fields are read one at a time, so a row taken while workers are
//! counting is per-field accurate but not a cross-field transaction.

use std::sync::Arc;

use serde::Serialize;

use crate::counters::CounterStore;

/// One row describing the current counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CounterRow {
    /// Backed by the statement-cancel counter
    pub messages_processed: u64,
    /// Backed by the statement-timeout counter
    pub messages_dropped: u64,
    pub lock_timeout: u64,
    pub idle_in_tx_timeout: u64,
}

/// Read/reset entry points over a shared store
#[derive(Debug, Clone)]
pub struct CounterQuery {
    store: Arc<CounterStore>,
}

impl CounterQuery {
    pub fn new(store: Arc<CounterStore>) -> Self {
        Self { store }
    }

    pub fn get_snapshot(&self) -> CounterRow {
        let values = self.store.read_all();
        CounterRow {
            messages_processed: values.statement_cancel,
            messages_dropped: values.statement_timeout,
            lock_timeout: values.lock_timeout,
            idle_in_tx_timeout: values.idle_in_tx_timeout,
        }
    }

    pub fn reset(&self) {
        self.store.reset_all();
    }
}
