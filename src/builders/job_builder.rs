//! Builds a [`SweepJob`] from configuration and injected capabilities.

use std::sync::Arc;

use crate::config::SweeperConfig;
use crate::core::{
    AuditSink, BudgetPlanner, CapacityRegistry, CursorStore, LoadSensor, PolicyExecutor,
    PolicyStore, RunLock, SweepController, SweepError, SweepJob,
};

/// External collaborators a sweep job is wired to.
#[derive(Clone)]
pub struct SweepCapabilities {
    /// Policy collection.
    pub store: Arc<dyn PolicyStore>,
    /// Per-policy work executor.
    pub executor: Arc<dyn PolicyExecutor>,
    /// Persisted cursor slot.
    pub cursor: Arc<dyn CursorStore>,
    /// Overload veto.
    pub load: Arc<dyn LoadSensor>,
    /// Downstream worker registry.
    pub registry: Arc<dyn CapacityRegistry>,
    /// Run-level mutual exclusion.
    pub lock: Arc<dyn RunLock>,
    /// Optional audit trail shared by the job and its controller.
    pub audit: Option<Arc<dyn AuditSink>>,
}

/// Validate `cfg` and wire planner, controller and job together.
///
/// # Errors
///
/// Returns [`SweepError::InvalidConfig`] if the configuration is invalid.
pub fn build_sweep_job(
    cfg: &SweeperConfig,
    capabilities: SweepCapabilities,
) -> Result<SweepJob, SweepError> {
    cfg.validate().map_err(SweepError::InvalidConfig)?;

    let planner = BudgetPlanner::new(
        cfg.budget_limits(),
        cfg.queue_name.clone(),
        capabilities.registry,
    );

    let mut controller = SweepController::new(
        cfg.sweep_settings(),
        capabilities.store,
        capabilities.executor,
        capabilities.cursor,
        capabilities.load,
    );
    if let Some(audit) = &capabilities.audit {
        controller = controller.with_audit(Arc::clone(audit));
    }

    let mut job = SweepJob::new(
        planner,
        controller,
        capabilities.lock,
        cfg.lock_key.clone(),
        cfg.lock_ttl(),
    );
    if let Some(audit) = capabilities.audit {
        job = job.with_audit(audit);
    }

    tracing::debug!(
        queue = %cfg.queue_name,
        max_budget = cfg.max_budget,
        per_account_budget = cfg.per_account_budget,
        "built sweep job"
    );
    Ok(job)
}
