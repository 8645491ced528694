//! Relay configuration
//!
//! Defaults match a stock deployment; every field can be overridden with a
//! `LOG_RELAY_*` environment variable:
//!
//! ```text
//! LOG_RELAY_DATA_DIR=pg_stat
//! LOG_RELAY_ENDPOINT=http://interlog.logging.stg.s.o3.ru/_bulk
//! LOG_RELAY_SERVICE=testing-t
//! LOG_RELAY_TIMEOUT_SECS=5
//! LOG_RELAY_FORMAT_VERSION=1
//! LOG_RELAY_HTTP_ADDR=127.0.0.1:3030
//! LOG_RELAY_CODE_TABLE=57014=statement_cancel,55P03=lock_timeout
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::counters::CodeTable;
use crate::forwarder::{payload_overhead, PAYLOAD_BUFFER_SIZE};

/// File name of the counter snapshot inside the data directory
pub const SNAPSHOT_FILE_NAME: &str = "pg_logger.stat";

/// Ingestion endpoint receiving forwarded events
pub const DEFAULT_ENDPOINT: &str = "http://interlog.logging.stg.s.o3.ru/_bulk";

/// Static service tag stamped on every forwarded document
pub const DEFAULT_SERVICE_TAG: &str = "testing-t";

pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Snapshot format version written by this build
pub const DEFAULT_FORMAT_VERSION: u32 = 1;

pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:3030";

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Complete relay configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Directory holding the snapshot file
    pub data_dir: PathBuf,
    pub endpoint: String,
    pub service_tag: String,
    /// Upper bound on one forwarding round trip
    pub timeout: Duration,
    pub format_version: u32,
    /// Bind address of the admin HTTP API
    pub http_addr: SocketAddr,
    /// Error-code classification table; empty means nothing is counted
    pub code_table: CodeTable,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("pg_stat"),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            service_tag: DEFAULT_SERVICE_TAG.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            format_version: DEFAULT_FORMAT_VERSION,
            http_addr: SocketAddr::from(([127, 0, 0, 1], 3030)),
            code_table: CodeTable::new(),
        }
    }
}

impl RelayConfig {
    /// Create config with custom data directory
    pub fn with_data_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup` (the environment, or a map in tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("LOG_RELAY_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(endpoint) = lookup("LOG_RELAY_ENDPOINT") {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ConfigError::Invalid {
                    var: "LOG_RELAY_ENDPOINT",
                    reason: format!("'{}' is not an http(s) URL", endpoint),
                });
            }
            config.endpoint = endpoint;
        }
        if let Some(tag) = lookup("LOG_RELAY_SERVICE") {
            let overhead = payload_overhead(&tag);
            if overhead > PAYLOAD_BUFFER_SIZE {
                return Err(ConfigError::Invalid {
                    var: "LOG_RELAY_SERVICE",
                    reason: format!(
                        "tag leaves no room in the {}-byte payload ({} bytes without a message)",
                        PAYLOAD_BUFFER_SIZE, overhead
                    ),
                });
            }
            config.service_tag = tag;
        }
        if let Some(secs) = lookup("LOG_RELAY_TIMEOUT_SECS") {
            let secs: u64 = parse_var("LOG_RELAY_TIMEOUT_SECS", &secs)?;
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    var: "LOG_RELAY_TIMEOUT_SECS",
                    reason: "timeout must be at least one second".to_string(),
                });
            }
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(version) = lookup("LOG_RELAY_FORMAT_VERSION") {
            config.format_version = parse_var("LOG_RELAY_FORMAT_VERSION", &version)?;
        }
        if let Some(addr) = lookup("LOG_RELAY_HTTP_ADDR") {
            config.http_addr = parse_var("LOG_RELAY_HTTP_ADDR", &addr)?;
        }
        if let Some(table) = lookup("LOG_RELAY_CODE_TABLE") {
            config.code_table = CodeTable::parse(&table).map_err(|e| ConfigError::Invalid {
                var: "LOG_RELAY_CODE_TABLE",
                reason: e.to_string(),
            })?;
        }

        Ok(config)
    }

    /// Get path to the canonical snapshot file
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILE_NAME)
    }
}

fn parse_var<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: format!("'{}': {}", raw, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RelayConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.service_tag, "testing-t");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.snapshot_path(), PathBuf::from("pg_stat/pg_logger.stat"));
        assert!(config.code_table.is_empty());
        assert_eq!(config.http_addr.to_string(), DEFAULT_HTTP_ADDR);
    }

    #[test]
    fn test_overrides() {
        let config = RelayConfig::from_lookup(lookup_from(&[
            ("LOG_RELAY_DATA_DIR", "/var/lib/relay"),
            ("LOG_RELAY_ENDPOINT", "http://localhost:9200/_bulk"),
            ("LOG_RELAY_TIMEOUT_SECS", "2"),
            ("LOG_RELAY_FORMAT_VERSION", "16"),
            ("LOG_RELAY_HTTP_ADDR", "0.0.0.0:8080"),
            ("LOG_RELAY_CODE_TABLE", "55P03=lock_timeout"),
        ]))
        .unwrap();

        assert_eq!(config.snapshot_path(), PathBuf::from("/var/lib/relay/pg_logger.stat"));
        assert_eq!(config.endpoint, "http://localhost:9200/_bulk");
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.format_version, 16);
        assert_eq!(config.http_addr.port(), 8080);
        assert_eq!(config.code_table.len(), 1);
    }

    #[test]
    fn test_invalid_values() {
        for (var, value) in [
            ("LOG_RELAY_TIMEOUT_SECS", "soon"),
            ("LOG_RELAY_TIMEOUT_SECS", "0"),
            ("LOG_RELAY_FORMAT_VERSION", "-1"),
            ("LOG_RELAY_HTTP_ADDR", "nowhere"),
            ("LOG_RELAY_ENDPOINT", "ftp://logs"),
            ("LOG_RELAY_CODE_TABLE", "55P03"),
        ] {
            let err = RelayConfig::from_lookup(lookup_from(&[(var, value)])).unwrap_err();
            assert!(err.to_string().contains(var), "{} -> {}", var, err);
        }
    }

    #[test]
    fn test_service_tag_must_fit_payload() {
        let oversized = "s".repeat(2000);
        let err = RelayConfig::from_lookup(lookup_from(&[("LOG_RELAY_SERVICE", &oversized)])).unwrap_err();
        assert!(err.to_string().contains("LOG_RELAY_SERVICE"));

        let fitting = "s".repeat(PAYLOAD_BUFFER_SIZE - payload_overhead(""));
        let config = RelayConfig::from_lookup(lookup_from(&[("LOG_RELAY_SERVICE", &fitting)])).unwrap();
        assert!(crate::forwarder::build_payload(&config.service_tag, "msg").body.len() <= PAYLOAD_BUFFER_SIZE);
    }
}
