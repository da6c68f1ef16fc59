//! One sweep invocation: lock, plan, run, release.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use super::{
    AuditSink, BudgetPlanner, RunLock, SweepAction, SweepController, SweepError, SweepReport,
    build_audit_event,
};

/// Result of a single trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Another invocation holds the run lock; nothing was done.
    LockHeld,
    /// The sweep ran to one of its stopping points.
    Ran(SweepReport),
}

impl JobOutcome {
    /// Report of the run, if one happened.
    #[must_use]
    pub const fn report(&self) -> Option<&SweepReport> {
        match self {
            Self::LockHeld => None,
            Self::Ran(report) => Some(report),
        }
    }
}

/// Composes the budget planner and the sweep controller behind the run lock.
pub struct SweepJob {
    planner: BudgetPlanner,
    controller: SweepController,
    lock: Arc<dyn RunLock>,
    lock_key: String,
    lock_ttl: Duration,
    audit: Option<Arc<dyn AuditSink>>,
}

impl SweepJob {
    /// Create a job guarded by `lock` under `lock_key`.
    pub fn new(
        planner: BudgetPlanner,
        controller: SweepController,
        lock: Arc<dyn RunLock>,
        lock_key: impl Into<String>,
        lock_ttl: Duration,
    ) -> Self {
        Self {
            planner,
            controller,
            lock,
            lock_key: lock_key.into(),
            lock_ttl,
            audit: None,
        }
    }

    /// Attach an audit sink for lock contention events.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// The wrapped controller.
    #[must_use]
    pub const fn controller(&self) -> &SweepController {
        &self.controller
    }

    /// The wrapped planner.
    #[must_use]
    pub const fn planner(&self) -> &BudgetPlanner {
        &self.planner
    }

    /// Run one sweep if no other invocation is in flight.
    ///
    /// The lock is released whether or not the sweep succeeded.
    ///
    /// # Errors
    ///
    /// Returns the first failure among lock acquisition, budget planning and
    /// the sweep itself. A release failure is only returned when the sweep
    /// succeeded; otherwise it is logged and the sweep error wins.
    pub async fn invoke(&self) -> Result<JobOutcome, SweepError> {
        let Some(token) = self.lock.try_acquire(&self.lock_key, self.lock_ttl).await? else {
            tracing::info!(lock_key = %self.lock_key, "sweep already running, skipping trigger");
            if let Some(sink) = &self.audit {
                sink.record(build_audit_event(
                    Uuid::new_v4().to_string(),
                    SweepAction::LockHeld,
                    None,
                    None,
                ));
            }
            return Ok(JobOutcome::LockHeld);
        };

        let result = self.plan_and_run().await;

        match self.lock.release(&self.lock_key, &token).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(lock_key = %self.lock_key, "run lock lease expired before release");
            }
            Err(err) if result.is_ok() => return Err(err),
            Err(err) => {
                tracing::warn!(lock_key = %self.lock_key, error = %err, "failed to release run lock");
            }
        }

        result.map(JobOutcome::Ran)
    }

    async fn plan_and_run(&self) -> Result<SweepReport, SweepError> {
        let budget = self.planner.compute_budget().await?;
        self.controller.run(budget).await
    }
}
