//! Counter identifiers and plain counter values

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from parsing counter names and code tables
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown counter: {0}")]
    UnknownCounter(String),
    #[error("expected CODE=counter, got '{0}'")]
    MissingSeparator(String),
    #[error("empty error code in '{0}'")]
    EmptyCode(String),
}

/// Identifies one of the four shared counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterId {
    StatementCancel,
    StatementTimeout,
    LockTimeout,
    IdleInTxTimeout,
}

impl CounterId {
    /// All counters in snapshot layout order
    pub const ALL: [CounterId; 4] = [
        CounterId::StatementCancel,
        CounterId::StatementTimeout,
        CounterId::LockTimeout,
        CounterId::IdleInTxTimeout,
    ];

    /// Stable name used in configuration and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            CounterId::StatementCancel => "statement_cancel",
            CounterId::StatementTimeout => "statement_timeout",
            CounterId::LockTimeout => "lock_timeout",
            CounterId::IdleInTxTimeout => "idle_in_tx_timeout",
        }
    }
}

impl std::fmt::Display for CounterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CounterId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CounterId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ParseError::UnknownCounter(s.to_string()))
    }
}

/// Plain (non-atomic) copy of the four counters
///
/// Produced by `CounterStore::read_all` and by snapshot decoding. Fields are
/// read independently, so a copy taken under concurrent writers is not a
/// cross-field consistent view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterValues {
    pub statement_cancel: u64,
    pub statement_timeout: u64,
    pub lock_timeout: u64,
    pub idle_in_tx_timeout: u64,
}

impl CounterValues {
    pub fn new(statement_cancel: u64, statement_timeout: u64, lock_timeout: u64, idle_in_tx_timeout: u64) -> Self {
        Self {
            statement_cancel,
            statement_timeout,
            lock_timeout,
            idle_in_tx_timeout,
        }
    }

    /// Value of a single counter
    pub fn get(&self, id: CounterId) -> u64 {
        match id {
            CounterId::StatementCancel => self.statement_cancel,
            CounterId::StatementTimeout => self.statement_timeout,
            CounterId::LockTimeout => self.lock_timeout,
            CounterId::IdleInTxTimeout => self.idle_in_tx_timeout,
        }
    }

    pub fn is_zero(&self) -> bool {
        CounterId::ALL.iter().all(|id| self.get(*id) == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_id_round_trips_through_name() {
        for id in CounterId::ALL {
            assert_eq!(id.as_str().parse::<CounterId>().unwrap(), id);
        }
        assert_eq!(
            "deadlock".parse::<CounterId>(),
            Err(ParseError::UnknownCounter("deadlock".to_string()))
        );
    }

    #[test]
    fn test_values_get() {
        let values = CounterValues::new(1, 2, 3, 4);
        assert_eq!(values.get(CounterId::StatementCancel), 1);
        assert_eq!(values.get(CounterId::IdleInTxTimeout), 4);
        assert!(!values.is_zero());
        assert!(CounterValues::default().is_zero());
    }
}
