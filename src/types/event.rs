//! Host event record
//!
//! One `Event` is built per log/error occurrence raised by the host and
//! handed to every registered hook. Only `message` is required; the
//! remaining fields are whatever classification data the host carries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a host event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    #[default]
    Log,
    Info,
    Notice,
    Warning,
    Error,
    Fatal,
    Panic,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Severity::Debug => "debug",
            Severity::Log => "log",
            Severity::Info => "info",
            Severity::Notice => "notice",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
            Severity::Panic => "panic",
        };
        f.write_str(label)
    }
}

/// A single log/error event raised by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Human-readable message, forwarded verbatim (up to the payload limit)
    pub message: String,
    #[serde(default)]
    pub severity: Severity,
    /// Host error code (e.g. a five-character SQLSTATE)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Event {
    /// Create an event with the given severity and message
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity,
            code: None,
            timestamp: Utc::now(),
        }
    }

    /// Create an error-level event
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Attach a host error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}
