//! Static capacity and load signals.
//!
//! Settable stand-ins for the worker registry and load sensor, used by tests,
//! benches and single-process deployments that feed the values themselves.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::core::{CapacityRegistry, LoadSensor, SweepError};

/// Worker registry holding a live worker count per queue.
#[derive(Default)]
pub struct StaticWorkerRegistry {
    counts: RwLock<HashMap<String, u32>>,
}

impl StaticWorkerRegistry {
    /// Create an empty registry; unknown queues report zero workers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry reporting `count` workers for `queue`.
    pub fn with_queue(queue: impl Into<String>, count: u32) -> Self {
        let registry = Self::new();
        registry.set(queue, count);
        registry
    }

    /// Update the live worker count for `queue`.
    pub fn set(&self, queue: impl Into<String>, count: u32) {
        self.counts.write().insert(queue.into(), count);
    }
}

#[async_trait]
impl CapacityRegistry for StaticWorkerRegistry {
    async fn live_worker_count(&self, queue: &str) -> Result<u32, SweepError> {
        Ok(self.counts.read().get(queue).copied().unwrap_or(0))
    }
}

/// Load sensor backed by a flag.
#[derive(Default)]
pub struct StaticLoadSensor {
    overloaded: AtomicBool,
}

impl StaticLoadSensor {
    /// Sensor that never vetoes until told otherwise.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the overload flag.
    pub fn set_overloaded(&self, overloaded: bool) {
        self.overloaded.store(overloaded, Ordering::Release);
    }
}

#[async_trait]
impl LoadSensor for StaticLoadSensor {
    async fn is_overloaded(&self) -> Result<bool, SweepError> {
        Ok(self.overloaded.load(Ordering::Acquire))
    }
}
