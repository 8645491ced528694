//! Snapshot persistence for the shared counters
//!
//! - **load** (process-group startup): read, validate and additively merge
//!   the snapshot, then delete it so it is never applied twice
//! - **dump** (clean shutdown only): encode the live counters and replace
//!   the snapshot atomically
//!
//! Every failure here is logged as a warning and swallowed. The host must
//! be able to start and stop regardless of what is on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::RelayConfig;
use crate::counters::CounterStore;
use crate::types::CounterValues;
use crate::utils::{atomic_write_bytes, remove_if_exists, temp_path_for};

use super::codec::{SnapshotCodec, SnapshotHeader};

/// Why the process group is going down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    Clean,
    /// Crash or other abnormal exit; in-memory counters are not trusted
    Abnormal,
}

impl ShutdownReason {
    /// Non-zero exit codes are abnormal
    pub fn from_exit_code(code: i32) -> Self {
        if code == 0 {
            ShutdownReason::Clean
        } else {
            ShutdownReason::Abnormal
        }
    }
}

/// Result of a load attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No snapshot on disk
    Absent,
    /// The file exists but could not be read
    Unreadable,
    /// Wrong size
    Corrupt,
    /// Parsed, but magic or version did not match
    Rejected(SnapshotHeader),
    /// Merged into the live store
    Restored(CounterValues),
}

/// Result of a dump attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpOutcome {
    SkippedAbnormal,
    SkippedUninitialized,
    Written(CounterValues),
    Failed,
}

/// Owns the snapshot file at one canonical path
#[derive(Debug, Clone)]
pub struct PersistenceManager {
    path: PathBuf,
    codec: SnapshotCodec,
}

impl PersistenceManager {
    pub fn new(path: impl Into<PathBuf>, codec: SnapshotCodec) -> Self {
        Self {
            path: path.into(),
            codec,
        }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(config.snapshot_path(), SnapshotCodec::new(config.format_version))
    }

    /// Canonical snapshot path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Temporary path used while dumping
    pub fn temp_path(&self) -> PathBuf {
        temp_path_for(&self.path)
    }

    /// Load the snapshot into `store` (expected to be freshly zeroed)
    pub fn load(&self, store: &CounterStore) -> LoadOutcome {
        self.remove_quietly(&self.temp_path());

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no snapshot to load");
                return LoadOutcome::Absent;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read snapshot file");
                self.remove_quietly(&self.path);
                return LoadOutcome::Unreadable;
            }
        };

        let outcome = match self.codec.decode(&bytes) {
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "discarding corrupt snapshot");
                LoadOutcome::Corrupt
            }
            Ok(decoded) if !decoded.valid => {
                warn!(
                    path = %self.path.display(),
                    magic = format_args!("{:#010x}", decoded.header.magic),
                    version = decoded.header.format_version,
                    expected_version = self.codec.format_version(),
                    "discarding snapshot with mismatched header"
                );
                LoadOutcome::Rejected(decoded.header)
            }
            Ok(decoded) => {
                store.merge(&decoded.counters);
                info!(path = %self.path.display(), counters = ?decoded.counters, "restored counters from snapshot");
                LoadOutcome::Restored(decoded.counters)
            }
        };

        // A snapshot is applied at most once, whatever happened above
        self.remove_quietly(&self.path);
        outcome
    }

    /// Write the live counters to disk if this is a clean shutdown
    pub fn dump(&self, store: Option<&CounterStore>, reason: ShutdownReason) -> DumpOutcome {
        if reason == ShutdownReason::Abnormal {
            debug!("abnormal shutdown, skipping snapshot dump");
            return DumpOutcome::SkippedAbnormal;
        }
        let Some(store) = store else {
            debug!("counter store never initialized, skipping snapshot dump");
            return DumpOutcome::SkippedUninitialized;
        };

        let values = store.read_all();
        match atomic_write_bytes(&self.path, &self.codec.encode(&values)) {
            Ok(()) => {
                info!(path = %self.path.display(), counters = ?values, "dumped counters to snapshot");
                DumpOutcome::Written(values)
            }
            Err(e) => {
                warn!(error = %e, "could not dump counter snapshot");
                DumpOutcome::Failed
            }
        }
    }

    fn remove_quietly(&self, path: &Path) {
        match remove_if_exists(path) {
            Ok(true) => debug!(path = %path.display(), "removed snapshot file"),
            Ok(false) => {}
            Err(e) => warn!(path = %path.display(), error = %e, "could not remove snapshot file"),
        }
    }
}
