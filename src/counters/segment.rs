//! Named shared-segment registry
//!
//! Workers attach to the counter block by name. The first attacher creates
//! and publishes a zeroed block; every later attacher receives the same
//! block with `found = true` and must not re-zero it or reload a snapshot.
//!
//! The registry lock serializes attach only. Counter traffic goes straight
//! to the atomics in `CounterStore` and never touches this lock.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use tracing::debug;

use super::store::CounterStore;

/// Name under which the relay's counter block is published
pub const SEGMENT_NAME: &str = "pg_logger";

/// Process-wide registry (initialized on first use)
static GLOBAL_REGISTRY: OnceLock<Arc<SegmentRegistry>> = OnceLock::new();

/// Result of attaching to a named segment
#[derive(Debug, Clone)]
pub struct Attachment {
    pub store: Arc<CounterStore>,
    /// `true` when the segment already existed before this attach
    pub found: bool,
}

/// Registry of named counter blocks shared by all workers of a process group
#[derive(Debug, Default)]
pub struct SegmentRegistry {
    segments: Mutex<HashMap<String, Arc<CounterStore>>>,
}

impl SegmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by every worker in this process
    pub fn global() -> Arc<SegmentRegistry> {
        Arc::clone(GLOBAL_REGISTRY.get_or_init(|| Arc::new(SegmentRegistry::new())))
    }

    /// Create or attach to the segment called `name`
    pub fn attach(&self, name: &str) -> Attachment {
        let mut segments = self.segments.lock();
        if let Some(store) = segments.get(name) {
            debug!(segment = name, "attached to existing segment");
            return Attachment {
                store: Arc::clone(store),
                found: true,
            };
        }

        let store = Arc::new(CounterStore::new());
        segments.insert(name.to_string(), Arc::clone(&store));
        debug!(segment = name, "created segment");
        Attachment { store, found: false }
    }

    /// Drop a segment so the next attach starts from scratch (process-group teardown)
    pub fn release(&self, name: &str) -> bool {
        self.segments.lock().remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.segments.lock().contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CounterId;
    use std::thread;

    #[test]
    fn test_first_attach_creates_later_attach_finds() {
        let registry = SegmentRegistry::new();

        let first = registry.attach("counters");
        assert!(!first.found);
        first.store.increment(CounterId::LockTimeout);

        let second = registry.attach("counters");
        assert!(second.found);
        assert!(Arc::ptr_eq(&first.store, &second.store));
        assert_eq!(second.store.read(CounterId::LockTimeout), 1);
    }

    #[test]
    fn test_concurrent_attach_has_single_creator() {
        let registry = Arc::new(SegmentRegistry::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.attach("shared").found)
            })
            .collect();

        let creators = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|found| !found)
            .count();
        assert_eq!(creators, 1);
    }

    #[test]
    fn test_release() {
        let registry = SegmentRegistry::new();
        registry.attach("a").store.increment(CounterId::StatementCancel);
        assert!(registry.release("a"));
        assert!(!registry.contains("a"));

        let again = registry.attach("a");
        assert!(!again.found);
        assert_eq!(again.store.read(CounterId::StatementCancel), 0);
    }

    #[test]
    fn test_global_is_shared() {
        assert!(Arc::ptr_eq(&SegmentRegistry::global(), &SegmentRegistry::global()));
    }
}
