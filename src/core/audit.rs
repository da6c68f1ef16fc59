//! Audit sink implementations.
//!
//! Records the lifecycle of sweep runs: started, skipped, exhausted,
//! converged, failed.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PolicyId;
use crate::util::clock::now_ms;

/// Lifecycle step recorded for a sweep invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepAction {
    /// Run began with a budget and a start cursor.
    Started,
    /// Load sensor vetoed the run.
    Vetoed,
    /// Run was handed a zero budget.
    NoBudget,
    /// Another invocation held the run lock.
    LockHeld,
    /// Budget ran out and the cursor was persisted.
    Exhausted,
    /// Run converged without touching the cursor.
    Converged,
    /// Run aborted with an error.
    Failed,
}

impl fmt::Display for SweepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Started => "started",
            Self::Vetoed => "vetoed",
            Self::NoBudget => "no_budget",
            Self::LockHeld => "lock_held",
            Self::Exhausted => "exhausted",
            Self::Converged => "converged",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Audit event structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepAuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Run the event belongs to.
    pub run_id: String,
    /// Lifecycle step.
    pub action: SweepAction,
    /// Policy relevant to the step (start cursor, persisted cursor).
    pub policy_id: Option<PolicyId>,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Additional context.
    pub detail: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: SweepAuditEvent);
}

/// In-memory audit sink for testing and dev.
///
/// Clones share the same buffer.
#[derive(Clone)]
pub struct InMemoryAuditSink {
    events: Arc<Mutex<VecDeque<SweepAuditEvent>>>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(max_events))),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    #[must_use]
    pub fn events(&self) -> Vec<SweepAuditEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Actions of the stored events, oldest first.
    #[must_use]
    pub fn actions(&self) -> Vec<SweepAction> {
        self.events.lock().iter().map(|e| e.action).collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&self, event: SweepAuditEvent) {
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}

/// Helper to build an audit event from context.
pub fn build_audit_event(
    run_id: impl Into<String>,
    action: SweepAction,
    policy_id: Option<PolicyId>,
    detail: Option<String>,
) -> SweepAuditEvent {
    SweepAuditEvent {
        event_id: Uuid::new_v4().to_string(),
        run_id: run_id.into(),
        action,
        policy_id,
        created_at_ms: now_ms(),
        detail,
    }
}
