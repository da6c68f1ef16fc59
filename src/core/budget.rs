//! Run budget sizing from live downstream capacity.

use std::sync::Arc;

use super::{CapacityRegistry, SweepError};

/// Fixed ceilings used to size a run budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetLimits {
    /// Units granted per live downstream worker.
    pub per_thread_budget: u32,
    /// Absolute ceiling regardless of capacity.
    pub max_budget: u32,
}

impl BudgetLimits {
    /// Budget for a run given `live_workers` downstream workers.
    #[must_use]
    pub fn budget_for(&self, live_workers: u32) -> u32 {
        self.per_thread_budget
            .saturating_mul(live_workers)
            .min(self.max_budget)
    }
}

impl Default for BudgetLimits {
    fn default() -> Self {
        Self {
            per_thread_budget: 5,
            max_budget: 300,
        }
    }
}

/// Computes how much work a run may perform.
///
/// Ties the sweep's aggressiveness to the number of workers able to absorb the
/// follow-on jobs it fans out, capped so a large pool never turns into an
/// unbounded run.
pub struct BudgetPlanner {
    limits: BudgetLimits,
    queue: String,
    registry: Arc<dyn CapacityRegistry>,
}

impl BudgetPlanner {
    /// Create a planner reading capacity for `queue` from `registry`.
    pub fn new(
        limits: BudgetLimits,
        queue: impl Into<String>,
        registry: Arc<dyn CapacityRegistry>,
    ) -> Self {
        Self {
            limits,
            queue: queue.into(),
            registry,
        }
    }

    /// Configured limits.
    #[must_use]
    pub const fn limits(&self) -> BudgetLimits {
        self.limits
    }

    /// Compute the budget for the current run.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::CapacityRegistry`] if the worker count cannot be
    /// read. No partial budget is produced.
    pub async fn compute_budget(&self) -> Result<u32, SweepError> {
        let live_workers = self.registry.live_worker_count(&self.queue).await?;
        let budget = self.limits.budget_for(live_workers);
        tracing::debug!(
            queue = %self.queue,
            live_workers,
            budget,
            "computed sweep budget"
        );
        Ok(budget)
    }
}
