//! Counter snapshot persistence
//!
//! - `SnapshotCodec`: fixed 40-byte binary layout with magic and version
//! - `PersistenceManager`: load-once-and-delete on startup, atomic dump on
//!   clean shutdown
//!
//! # Lifecycle
//!
//! ```text
//! startup:   read pg_logger.stat ──► validate ──► merge ──► unlink
//! shutdown:  encode ──► pg_logger.stat.tmp ──► fsync ──► rename
//! ```

mod codec;
mod manager;

pub use codec::{
    Decoded, FormatError, SnapshotCodec, SnapshotHeader, HEADER_LEN, SNAPSHOT_LEN, SNAPSHOT_MAGIC,
};
pub use manager::{DumpOutcome, LoadOutcome, PersistenceManager, ShutdownReason};
