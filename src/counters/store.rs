//! Lock-free shared counter block
//!
//! Every worker holds an `Arc<CounterStore>` pointing at the same block.
//! Each field is its own `AtomicU64`; updates are sequentially consistent
//! per counter and unordered across counters.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::{CounterId, CounterValues};

/// The four shared event counters
#[derive(Debug, Default)]
pub struct CounterStore {
    statement_cancel: AtomicU64,
    statement_timeout: AtomicU64,
    lock_timeout: AtomicU64,
    idle_in_tx_timeout: AtomicU64,
}

impl CounterStore {
    /// Create a zeroed block
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, id: CounterId) -> &AtomicU64 {
        match id {
            CounterId::StatementCancel => &self.statement_cancel,
            CounterId::StatementTimeout => &self.statement_timeout,
            CounterId::LockTimeout => &self.lock_timeout,
            CounterId::IdleInTxTimeout => &self.idle_in_tx_timeout,
        }
    }

    /// Atomically add 1 to a counter
    pub fn increment(&self, id: CounterId) {
        self.add(id, 1);
    }

    /// Atomically add `n` to a counter (wraps on overflow)
    pub fn add(&self, id: CounterId, n: u64) {
        self.slot(id).fetch_add(n, Ordering::SeqCst);
    }

    /// Current value of one counter
    pub fn read(&self, id: CounterId) -> u64 {
        self.slot(id).load(Ordering::SeqCst)
    }

    /// Read every counter, one atomic load per field
    pub fn read_all(&self) -> CounterValues {
        CounterValues {
            statement_cancel: self.read(CounterId::StatementCancel),
            statement_timeout: self.read(CounterId::StatementTimeout),
            lock_timeout: self.read(CounterId::LockTimeout),
            idle_in_tx_timeout: self.read(CounterId::IdleInTxTimeout),
        }
    }

    /// Set every counter to 0
    ///
    /// Fields are cleared one at a time. A concurrent reader may see some
    /// counters already reset and others not yet.
    pub fn reset_all(&self) {
        for id in CounterId::ALL {
            self.slot(id).store(0, Ordering::SeqCst);
        }
    }

    /// Additively fold restored values into the live block
    pub fn merge(&self, values: &CounterValues) {
        for id in CounterId::ALL {
            self.add(id, values.get(id));
        }
    }
}
