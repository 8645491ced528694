//! Interceptor lifecycle
//!
//! Wires one worker into the process group:
//!
//! ```text
//! start:     attach segment ──► startup chain ──► (first attacher) load snapshot
//!                           ──► register counting + forwarding hooks
//! shutdown:  (first attacher, once) dump snapshot unless abnormal ──► release segment
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::RelayConfig;
use crate::counters::{
    Attachment, CounterStore, CountingHook, EventClassifier, NoClassification, SegmentRegistry,
    SEGMENT_NAME,
};
use crate::forwarder::{EventForwarder, Transport};
use crate::hooks::{EventPipeline, StartupChain};
use crate::query::CounterQuery;
use crate::snapshot::{DumpOutcome, LoadOutcome, PersistenceManager, ShutdownReason};

/// One worker's view of the relay
pub struct Interceptor {
    registry: Arc<SegmentRegistry>,
    attachment: Attachment,
    pipeline: Arc<EventPipeline>,
    persistence: PersistenceManager,
    shut_down: AtomicBool,
}

impl Interceptor {
    /// Attach to the shared counters and hook into `pipeline`
    ///
    /// `startup` holds the host's own hooks; they run first, then the first
    /// attacher loads the snapshot. The chain itself is left untouched.
    pub fn start(
        config: &RelayConfig,
        registry: Arc<SegmentRegistry>,
        startup: &StartupChain,
        pipeline: Arc<EventPipeline>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let persistence = PersistenceManager::from_config(config);

        let attachment = registry.attach(SEGMENT_NAME);
        startup.run(&attachment);
        if !attachment.found {
            if let LoadOutcome::Restored(values) = persistence.load(&attachment.store) {
                info!(counters = ?values, "counters restored");
            }
        }

        let classifier: Box<dyn EventClassifier> = if config.code_table.is_empty() {
            Box::new(NoClassification)
        } else {
            Box::new(config.code_table.clone())
        };
        pipeline.register(Arc::new(CountingHook::new(
            Arc::clone(&attachment.store),
            classifier,
        )));
        pipeline.register(Arc::new(EventForwarder::new(
            config.endpoint.clone(),
            config.service_tag.clone(),
            transport,
        )));

        info!(
            first_attach = !attachment.found,
            endpoint = %config.endpoint,
            snapshot = %persistence.path().display(),
            "interceptor started"
        );

        Self {
            registry,
            attachment,
            pipeline,
            persistence,
            shut_down: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &Arc<CounterStore> {
        &self.attachment.store
    }

    pub fn pipeline(&self) -> &Arc<EventPipeline> {
        &self.pipeline
    }

    pub fn query(&self) -> CounterQuery {
        CounterQuery::new(Arc::clone(&self.attachment.store))
    }

    /// `true` for the worker that created the segment and owns the dump
    pub fn owns_segment(&self) -> bool {
        !self.attachment.found
    }

    /// Tear down; returns `None` when this worker does not dump or already did
    ///
    /// The owner destroys the segment after the dump attempt, so the next
    /// generation attaching to the same registry starts fresh and loads the
    /// snapshot.
    pub fn shutdown(&self, reason: ShutdownReason) -> Option<DumpOutcome> {
        if !self.owns_segment() {
            return None;
        }
        if self.shut_down.swap(true, Ordering::SeqCst) {
            warn!("interceptor already shut down");
            return None;
        }
        let outcome = self.persistence.dump(Some(&self.attachment.store), reason);
        self.registry.release(SEGMENT_NAME);
        Some(outcome)
    }
}
