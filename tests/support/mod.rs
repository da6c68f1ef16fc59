//! Deterministic collaborators shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use prometheus_sweeper::core::{
    AppResult, CapacityRegistry, CursorStore, InMemoryAuditSink, Policy, PolicyExecutor, PolicyId,
    SweepController, SweepError, SweepSettings,
};
use prometheus_sweeper::infra::{InMemoryCursorStore, InMemoryPolicyStore, StaticLoadSensor};

pub const CURSOR_KEY: &str = "cleanup_sweep:last_policy_id";

/// Executor that deletes from a per-policy backlog, at most `cap` units per call.
#[derive(Default)]
pub struct BacklogExecutor {
    backlog: Mutex<HashMap<PolicyId, u32>>,
    calls: Mutex<Vec<(PolicyId, u32)>>,
    fail_on: Mutex<Option<PolicyId>>,
    overrun_on: Mutex<Option<PolicyId>>,
    delay: Mutex<Option<Duration>>,
}

impl BacklogExecutor {
    pub fn new(backlog: impl IntoIterator<Item = (u64, u32)>) -> Self {
        let executor = Self::default();
        executor
            .backlog
            .lock()
            .extend(backlog.into_iter().map(|(id, units)| (PolicyId(id), units)));
        executor
    }

    pub fn fail_on(self, id: u64) -> Self {
        *self.fail_on.lock() = Some(PolicyId(id));
        self
    }

    pub fn overrun_on(self, id: u64) -> Self {
        *self.overrun_on.lock() = Some(PolicyId(id));
        self
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock() = Some(delay);
        self
    }

    /// `(policy, cap)` for every call, in order.
    pub fn calls(&self) -> Vec<(PolicyId, u32)> {
        self.calls.lock().clone()
    }

    /// Policy ids visited, in order.
    pub fn visited(&self) -> Vec<u64> {
        self.calls.lock().iter().map(|(id, _)| id.get()).collect()
    }

    pub fn remaining(&self, id: u64) -> u32 {
        self.backlog.lock().get(&PolicyId(id)).copied().unwrap_or(0)
    }

    pub fn total_remaining(&self) -> u64 {
        self.backlog.lock().values().map(|v| u64::from(*v)).sum()
    }
}

#[async_trait]
impl PolicyExecutor for BacklogExecutor {
    async fn apply(&self, policy: &Policy, cap_units: u32) -> AppResult<u32> {
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.calls.lock().push((policy.id, cap_units));
        if *self.fail_on.lock() == Some(policy.id) {
            anyhow::bail!("remote purge rejected");
        }
        if *self.overrun_on.lock() == Some(policy.id) {
            return Ok(cap_units + 1);
        }
        let mut backlog = self.backlog.lock();
        let left = backlog.entry(policy.id).or_insert(0);
        let done = (*left).min(cap_units);
        *left -= done;
        Ok(done)
    }
}

/// Which cursor operation should fail.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum CursorFault {
    Get,
    Set,
}

/// Cursor store wrapper that fails one kind of operation.
pub struct FaultyCursorStore {
    pub inner: InMemoryCursorStore,
    pub fault: CursorFault,
}

#[async_trait]
impl CursorStore for FaultyCursorStore {
    async fn get(&self, key: &str) -> Result<Option<PolicyId>, SweepError> {
        if self.fault == CursorFault::Get {
            return Err(SweepError::CursorStore("connection refused".into()));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, id: PolicyId, ttl: Duration) -> Result<(), SweepError> {
        if self.fault == CursorFault::Set {
            return Err(SweepError::CursorStore("connection refused".into()));
        }
        self.inner.set(key, id, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<(), SweepError> {
        self.inner.delete(key).await
    }
}

/// Registry that cannot be reached.
pub struct UnreachableRegistry;

#[async_trait]
impl CapacityRegistry for UnreachableRegistry {
    async fn live_worker_count(&self, _queue: &str) -> Result<u32, SweepError> {
        Err(SweepError::CapacityRegistry("registry timed out".into()))
    }
}

pub fn enabled_policies(ids: impl IntoIterator<Item = u64>) -> InMemoryPolicyStore {
    InMemoryPolicyStore::from_policies(ids.into_iter().map(Policy::enabled))
}

pub fn settings(per_account_budget: u32, page_size: usize) -> SweepSettings {
    SweepSettings {
        per_account_budget,
        cursor_key: CURSOR_KEY.into(),
        cursor_ttl: Duration::from_secs(3600),
        page_size,
    }
}

/// A controller plus handles on the fakes it was built from.
pub struct Harness {
    pub controller: SweepController,
    pub executor: Arc<BacklogExecutor>,
    pub cursor: Arc<InMemoryCursorStore>,
    pub load: Arc<StaticLoadSensor>,
    pub audit: InMemoryAuditSink,
}

impl Harness {
    pub fn new(store: InMemoryPolicyStore, executor: BacklogExecutor, settings: SweepSettings) -> Self {
        let executor = Arc::new(executor);
        let cursor = Arc::new(InMemoryCursorStore::new());
        let load = Arc::new(StaticLoadSensor::new());
        let audit = InMemoryAuditSink::new(100);
        let controller = SweepController::new(
            settings,
            Arc::new(store),
            executor.clone(),
            cursor.clone(),
            load.clone(),
        )
        .with_audit(Arc::new(audit.clone()));
        Self {
            controller,
            executor,
            cursor,
            load,
            audit,
        }
    }

    pub async fn set_cursor(&self, id: u64) {
        self.cursor
            .set(CURSOR_KEY, PolicyId(id), Duration::from_secs(3600))
            .await
            .unwrap();
    }

    pub async fn cursor(&self) -> Option<u64> {
        self.cursor.get(CURSOR_KEY).await.unwrap().map(PolicyId::get)
    }
}
