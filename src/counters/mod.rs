//! Shared event counters
//!
//! - `CounterStore`: four independently-atomic counters
//! - `SegmentRegistry`: named create-or-attach of the shared block
//! - `EventClassifier`: pluggable event → counter policy

mod classify;
mod segment;
mod store;

pub use classify::{CodeTable, CountingHook, EventClassifier, NoClassification};
pub use segment::{Attachment, SegmentRegistry, SEGMENT_NAME};
pub use store::CounterStore;
