//! Tests for the periodic sweep worker

use std::sync::Arc;
use std::time::Duration;

use prometheus_sweeper::builders::{SweepCapabilities, build_sweep_job};
use prometheus_sweeper::config::SweeperConfig;
use prometheus_sweeper::core::{AppResult, Policy, PolicyExecutor};
use prometheus_sweeper::infra::{
    InMemoryCursorStore, InMemoryPolicyStore, InMemoryRunLock, StaticLoadSensor,
    StaticWorkerRegistry,
};
use prometheus_sweeper::runtime::start_sweep_worker;
use tokio::sync::watch;

struct IdleExecutor;

#[async_trait::async_trait]
impl PolicyExecutor for IdleExecutor {
    async fn apply(&self, _policy: &Policy, _cap_units: u32) -> AppResult<u32> {
        Ok(0)
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_worker_exits_when_shutdown_already_requested() {
    let job = build_sweep_job(
        &SweeperConfig::default(),
        SweepCapabilities {
            store: Arc::new(InMemoryPolicyStore::from_policies([Policy::enabled(1u64)])),
            executor: Arc::new(IdleExecutor),
            cursor: Arc::new(InMemoryCursorStore::new()),
            load: Arc::new(StaticLoadSensor::new()),
            registry: Arc::new(StaticWorkerRegistry::with_queue("cleanup", 1)),
            lock: Arc::new(InMemoryRunLock::new()),
            audit: None,
        },
    )
    .expect("valid config");
    let (_tx, rx) = watch::channel(true);

    let triggers = start_sweep_worker(Arc::new(job), Duration::from_secs(60), rx).await;
    assert_eq!(triggers, 0);
}
