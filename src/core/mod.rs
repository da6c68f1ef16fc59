//! Core sweep abstractions, budget sizing and the iteration state machine.

pub mod error;
pub mod policy;
pub mod capabilities;
pub mod executor;
pub mod budget;
pub mod audit;
pub mod sweep;
pub mod job;

pub use error::{AppResult, SweepError};
pub use policy::{Policy, PolicyId, PolicyScope};
pub use capabilities::{CapacityRegistry, CursorStore, LeaseToken, LoadSensor, PolicyStore, RunLock};
pub use executor::PolicyExecutor;
pub use budget::{BudgetLimits, BudgetPlanner};
pub use audit::{AuditSink, InMemoryAuditSink, SweepAction, SweepAuditEvent, build_audit_event};
pub use sweep::{IterationState, SweepController, SweepOutcome, SweepReport, SweepSettings};
pub use job::{JobOutcome, SweepJob};
