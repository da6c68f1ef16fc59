//! Resumable, fairness-aware sweep over cleanup policies.
//!
//! A run walks the policy ring in up to three kinds of pass:
//!
//! 1. **First lap**: every enabled policy from the persisted cursor upward.
//! 2. **Wrap-around lap**: everything up to the cursor, plus the policies that
//!    already produced work this run.
//! 3. **Steady state**: only the policies that produced work during the laps.
//!
//! Each policy gets at most `per_account_budget` units per visit. When the run
//! budget hits zero the current policy id is persisted as the cursor so the
//! next run picks up where this one stopped. A run that drains everything it
//! can reach converges and leaves the cursor alone.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    AuditSink, CursorStore, LoadSensor, Policy, PolicyExecutor, PolicyId, PolicyScope,
    PolicyStore, SweepAction, SweepError, build_audit_event,
};

/// Knobs for a [`SweepController`].
#[derive(Debug, Clone)]
pub struct SweepSettings {
    /// Maximum units a single policy may receive per visit.
    pub per_account_budget: u32,
    /// Key of the persisted cursor slot.
    pub cursor_key: String,
    /// Expiry applied whenever the cursor is written.
    pub cursor_ttl: Duration,
    /// Number of policies fetched from the store per page.
    pub page_size: usize,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            per_account_budget: 5,
            cursor_key: "cleanup_sweep:last_policy_id".into(),
            cursor_ttl: Duration::from_secs(3600),
            page_size: 100,
        }
    }
}

impl SweepSettings {
    /// Reject settings under which a run could not make progress.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<(), SweepError> {
        if self.per_account_budget == 0 {
            return Err(SweepError::InvalidConfig(
                "per_account_budget must be greater than 0".into(),
            ));
        }
        if self.page_size == 0 {
            return Err(SweepError::InvalidConfig(
                "page_size must be greater than 0".into(),
            ));
        }
        if self.cursor_key.trim().is_empty() {
            return Err(SweepError::InvalidConfig("cursor_key must not be empty".into()));
        }
        Ok(())
    }
}

/// Per-run iteration state.
///
/// Flags only ever move from `true` to `false`; there is no method that sets
/// them back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationState {
    budget: u32,
    first_policy_id: PolicyId,
    first_iteration: bool,
    full_iteration: bool,
    affected: Vec<PolicyId>,
}

impl IterationState {
    /// Fresh state for a run starting at `first_policy_id` with `budget` units.
    #[must_use]
    pub const fn new(budget: u32, first_policy_id: PolicyId) -> Self {
        Self {
            budget,
            first_policy_id,
            first_iteration: true,
            full_iteration: true,
            affected: Vec::new(),
        }
    }

    /// Remaining budget.
    #[must_use]
    pub const fn budget(&self) -> u32 {
        self.budget
    }

    /// Cursor captured at run start; the wrap point of the full sweep.
    #[must_use]
    pub const fn first_policy_id(&self) -> PolicyId {
        self.first_policy_id
    }

    /// True during the first pass of the run.
    #[must_use]
    pub const fn is_first_iteration(&self) -> bool {
        self.first_iteration
    }

    /// True while the run still aims to cover every enabled policy.
    #[must_use]
    pub const fn is_full_iteration(&self) -> bool {
        self.full_iteration
    }

    /// Policies that produced work during the full-sweep passes, in encounter
    /// order. May contain duplicates.
    #[must_use]
    pub fn affected_policies(&self) -> &[PolicyId] {
        &self.affected
    }

    /// Scope of the next pass, derived from the current flags.
    #[must_use]
    pub fn next_scope(&self) -> PolicyScope {
        let affected = PolicyScope::IdSet {
            ids: self.affected.clone(),
        };
        match (self.full_iteration, self.first_iteration) {
            (true, true) => PolicyScope::RangeFrom {
                from: self.first_policy_id,
            },
            (true, false) => PolicyScope::union(
                PolicyScope::RangeTo {
                    to: self.first_policy_id,
                },
                affected,
            ),
            (false, _) => affected,
        }
    }

    /// Per-visit cap for the next policy.
    const fn cap(&self, per_account_budget: u32) -> u32 {
        if self.budget < per_account_budget {
            self.budget
        } else {
            per_account_budget
        }
    }

    /// Apply the bookkeeping for one executor call that produced `produced`
    /// units on `id`. `produced` must not exceed the cap handed out.
    fn record_visit(&mut self, id: PolicyId, produced: u32) {
        self.budget -= produced;
        if produced > 0 && self.full_iteration {
            self.affected.push(id);
        }
        if !self.first_iteration && self.full_iteration && id >= self.first_policy_id {
            // The wrap-around lap caught up with the resumption point.
            self.full_iteration = false;
        }
    }

    fn end_first_iteration(&mut self) {
        self.first_iteration = false;
    }

    fn end_full_iteration(&mut self) {
        self.full_iteration = false;
    }
}

/// How a single pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PassOutcome {
    /// The pass walked its whole scope.
    Completed {
        /// Policies in the pass that produced work.
        processed: u32,
    },
    /// Budget reached zero while visiting `at`.
    Exhausted {
        /// Policy being visited when the budget ran out.
        at: PolicyId,
    },
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SweepOutcome {
    /// The load sensor vetoed the run.
    Vetoed,
    /// The run was handed a zero budget.
    NoBudget,
    /// Budget ran out; `cursor` was persisted for the next run.
    Exhausted {
        /// Persisted resumption point.
        cursor: PolicyId,
    },
    /// Nothing reachable produced work anymore; cursor left untouched.
    Converged,
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Run identifier used in logs and audit events.
    pub run_id: Uuid,
    /// Budget the run started with.
    pub initial_budget: u32,
    /// Budget left when the run stopped.
    pub remaining_budget: u32,
    /// Number of executor invocations.
    pub executor_calls: u64,
    /// Sum of units reported by the executor.
    pub units_produced: u64,
    /// Passes started.
    pub passes: u32,
    /// Cursor read at run start, if any.
    pub start_cursor: Option<PolicyId>,
    /// Policies recorded as affected during the full sweep.
    pub affected_policies: Vec<PolicyId>,
    /// Why the run stopped.
    pub outcome: SweepOutcome,
}

impl SweepReport {
    fn idle(run_id: Uuid, budget: u32, outcome: SweepOutcome) -> Self {
        Self {
            run_id,
            initial_budget: budget,
            remaining_budget: budget,
            executor_calls: 0,
            units_produced: 0,
            passes: 0,
            start_cursor: None,
            affected_policies: Vec::new(),
            outcome,
        }
    }
}

#[derive(Debug, Default)]
struct RunCounters {
    executor_calls: u64,
    units_produced: u64,
}

/// Drives one sweep per invocation.
///
/// Callers are expected to hold the run lock for the duration of
/// [`SweepController::run`]; the controller itself keeps no state between
/// runs other than the persisted cursor.
pub struct SweepController {
    settings: SweepSettings,
    store: Arc<dyn PolicyStore>,
    executor: Arc<dyn PolicyExecutor>,
    cursor: Arc<dyn CursorStore>,
    load: Arc<dyn LoadSensor>,
    audit: Option<Arc<dyn AuditSink>>,
}

impl SweepController {
    /// Create a controller from its collaborators.
    pub fn new(
        settings: SweepSettings,
        store: Arc<dyn PolicyStore>,
        executor: Arc<dyn PolicyExecutor>,
        cursor: Arc<dyn CursorStore>,
        load: Arc<dyn LoadSensor>,
    ) -> Self {
        Self {
            settings,
            store,
            executor,
            cursor,
            load,
            audit: None,
        }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Controller settings.
    #[must_use]
    pub const fn settings(&self) -> &SweepSettings {
        &self.settings
    }

    /// Read the persisted cursor.
    ///
    /// # Errors
    ///
    /// Propagates cursor store failures.
    pub async fn current_cursor(&self) -> Result<Option<PolicyId>, SweepError> {
        self.cursor.get(&self.settings.cursor_key).await
    }

    /// Forget the persisted cursor so the next run starts from the lowest id.
    ///
    /// # Errors
    ///
    /// Propagates cursor store failures.
    pub async fn reset_cursor(&self) -> Result<(), SweepError> {
        self.cursor.delete(&self.settings.cursor_key).await?;
        tracing::info!(key = %self.settings.cursor_key, "sweep cursor reset");
        Ok(())
    }

    /// Run one sweep with `budget` units.
    ///
    /// # Errors
    ///
    /// Invalid settings fail the run with [`SweepError::InvalidConfig`] before
    /// any collaborator is consulted. Any collaborator failure aborts the run
    /// and is returned as is. Budget
    /// already consumed before the failure is not rolled back, and the cursor
    /// is only written on budget exhaustion.
    pub async fn run(&self, budget: u32) -> Result<SweepReport, SweepError> {
        let run_id = Uuid::new_v4();
        match self.sweep(run_id, budget).await {
            Ok(report) => Ok(report),
            Err(err) => {
                tracing::error!(%run_id, error = %err, "sweep run failed");
                self.audit(run_id, SweepAction::Failed, None, Some(err.to_string()));
                Err(err)
            }
        }
    }

    async fn sweep(&self, run_id: Uuid, budget: u32) -> Result<SweepReport, SweepError> {
        self.settings.validate()?;
        if self.load.is_overloaded().await? {
            tracing::info!(%run_id, "system overloaded, skipping sweep");
            self.audit(run_id, SweepAction::Vetoed, None, None);
            return Ok(SweepReport::idle(run_id, budget, SweepOutcome::Vetoed));
        }
        if budget == 0 {
            tracing::debug!(%run_id, "no budget available, skipping sweep");
            self.audit(run_id, SweepAction::NoBudget, None, None);
            return Ok(SweepReport::idle(run_id, budget, SweepOutcome::NoBudget));
        }

        let start_cursor = self.cursor.get(&self.settings.cursor_key).await?;
        let first_policy_id = start_cursor.unwrap_or(PolicyId::MIN);
        tracing::info!(%run_id, budget, %first_policy_id, "starting sweep");
        self.audit(
            run_id,
            SweepAction::Started,
            Some(first_policy_id),
            Some(format!("budget={budget}")),
        );

        let mut state = IterationState::new(budget, first_policy_id);
        let mut counters = RunCounters::default();
        let mut passes = 0;

        let outcome = loop {
            passes += 1;
            let (next, pass) = self.run_pass(state, &mut counters).await?;
            state = next;

            match pass {
                PassOutcome::Exhausted { at } => {
                    self.cursor
                        .set(&self.settings.cursor_key, at, self.settings.cursor_ttl)
                        .await?;
                    tracing::info!(%run_id, passes, cursor = %at, "sweep budget exhausted");
                    self.audit(run_id, SweepAction::Exhausted, Some(at), None);
                    break SweepOutcome::Exhausted { cursor: at };
                }
                PassOutcome::Completed { processed } => {
                    tracing::debug!(
                        %run_id,
                        pass = passes,
                        processed,
                        remaining = state.budget(),
                        "sweep pass completed"
                    );
                    if processed == 0 && !state.is_full_iteration() {
                        tracing::info!(
                            %run_id,
                            passes,
                            remaining = state.budget(),
                            "sweep converged"
                        );
                        self.audit(run_id, SweepAction::Converged, None, None);
                        break SweepOutcome::Converged;
                    }
                    if state.is_first_iteration() {
                        state.end_first_iteration();
                    } else {
                        state.end_full_iteration();
                    }
                }
            }
        };

        Ok(SweepReport {
            run_id,
            initial_budget: budget,
            remaining_budget: state.budget(),
            executor_calls: counters.executor_calls,
            units_produced: counters.units_produced,
            passes,
            start_cursor,
            affected_policies: state.affected_policies().to_vec(),
            outcome,
        })
    }

    /// Walk one scope page by page, visiting each policy in ascending order.
    async fn run_pass(
        &self,
        mut state: IterationState,
        counters: &mut RunCounters,
    ) -> Result<(IterationState, PassOutcome), SweepError> {
        let scope = state.next_scope();
        if scope.is_empty() {
            return Ok((state, PassOutcome::Completed { processed: 0 }));
        }
        tracing::debug!(scope = %scope.describe(), "starting sweep pass");

        let mut processed = 0;
        let mut after: Option<PolicyId> = None;
        loop {
            let page = self
                .store
                .fetch_page(&scope, after, self.settings.page_size)
                .await?;
            if let (Some(prev), Some(first)) = (after, page.first()) {
                if first.id <= prev {
                    return Err(SweepError::PolicyStore(format!(
                        "page after {prev} did not advance"
                    )));
                }
            }

            for policy in &page {
                let cap = state.cap(self.settings.per_account_budget);
                let produced = self.visit(policy, cap).await?;
                counters.executor_calls += 1;
                counters.units_produced += u64::from(produced);

                state.record_visit(policy.id, produced);
                if produced > 0 {
                    processed += 1;
                }
                if state.budget() == 0 {
                    return Ok((state, PassOutcome::Exhausted { at: policy.id }));
                }
            }

            let Some(last) = page.last() else { break };
            if page.len() < self.settings.page_size {
                break;
            }
            after = Some(last.id);
        }

        Ok((state, PassOutcome::Completed { processed }))
    }

    async fn visit(&self, policy: &Policy, cap: u32) -> Result<u32, SweepError> {
        let produced = self
            .executor
            .apply(policy, cap)
            .await
            .map_err(|e| SweepError::Executor {
                policy: policy.id,
                message: format!("{e:#}"),
            })?;
        if produced > cap {
            return Err(SweepError::ExecutorOverrun {
                policy: policy.id,
                requested: cap,
                produced,
            });
        }
        tracing::trace!(policy_id = %policy.id, cap, produced, "visited policy");
        Ok(produced)
    }

    fn audit(
        &self,
        run_id: Uuid,
        action: SweepAction,
        policy: Option<PolicyId>,
        detail: Option<String>,
    ) {
        if let Some(sink) = &self.audit {
            sink.record(build_audit_event(run_id.to_string(), action, policy, detail));
        }
    }
}
