//! Tests for builder modules

use std::sync::Arc;

use prometheus_sweeper::builders::{SweepCapabilities, build_sweep_job};
use prometheus_sweeper::config::SweeperConfig;
use prometheus_sweeper::core::{AppResult, Policy, PolicyExecutor, SweepError};
use prometheus_sweeper::infra::{
    InMemoryCursorStore, InMemoryPolicyStore, InMemoryRunLock, StaticLoadSensor,
    StaticWorkerRegistry,
};

struct IdleExecutor;

#[async_trait::async_trait]
impl PolicyExecutor for IdleExecutor {
    async fn apply(&self, _policy: &Policy, _cap_units: u32) -> AppResult<u32> {
        Ok(0)
    }
}

fn capabilities() -> SweepCapabilities {
    SweepCapabilities {
        store: Arc::new(InMemoryPolicyStore::new()),
        executor: Arc::new(IdleExecutor),
        cursor: Arc::new(InMemoryCursorStore::new()),
        load: Arc::new(StaticLoadSensor::new()),
        registry: Arc::new(StaticWorkerRegistry::with_queue("cleanup", 4)),
        lock: Arc::new(InMemoryRunLock::new()),
        audit: None,
    }
}

#[tokio::test]
async fn test_job_builder_applies_config() {
    let cfg = SweeperConfig {
        per_thread_budget: 7,
        per_account_budget: 3,
        page_size: 20,
        ..SweeperConfig::default()
    };

    let job = build_sweep_job(&cfg, capabilities()).unwrap();
    assert_eq!(job.planner().limits().per_thread_budget, 7);
    assert_eq!(job.planner().compute_budget().await.unwrap(), 28);
    assert_eq!(job.controller().settings().per_account_budget, 3);
    assert_eq!(job.controller().settings().page_size, 20);
}

#[test]
fn test_job_builder_rejects_invalid_config() {
    let cfg = SweeperConfig {
        max_budget: 0,
        ..SweeperConfig::default()
    };
    assert!(matches!(
        build_sweep_job(&cfg, capabilities()),
        Err(SweepError::InvalidConfig(_))
    ));
}
