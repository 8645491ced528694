//! Ordered shared-state initialization chain
//!
//! Runs once per attach, after the counter segment has been created or
//! found. Hooks registered earlier run first.

use parking_lot::Mutex;

use crate::counters::Attachment;

/// Callback run when a worker attaches to the counter segment
pub type StartupHook = Box<dyn Fn(&Attachment) + Send + Sync>;

#[derive(Default)]
pub struct StartupChain {
    hooks: Mutex<Vec<StartupHook>>,
}

impl StartupChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, hook: StartupHook) -> &Self {
        self.hooks.lock().push(hook);
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every hook in registration order
    pub fn run(&self, attachment: &Attachment) {
        for hook in self.hooks.lock().iter() {
            hook(attachment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::SegmentRegistry;
    use std::sync::Arc;

    #[test]
    fn test_chain_runs_in_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let chain = StartupChain::new();
        for label in ["prev", "ours"] {
            let order = order.clone();
            chain.register(Box::new(move |att: &Attachment| {
                order.lock().push((label, att.found));
            }));
        }

        let registry = SegmentRegistry::new();
        chain.run(&registry.attach("seg"));
        chain.run(&registry.attach("seg"));

        assert_eq!(
            *order.lock(),
            vec![("prev", false), ("ours", false), ("prev", true), ("ours", true)]
        );
    }
}
