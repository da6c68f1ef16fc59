//! Error types for sweep operations.

use thiserror::Error;

use super::PolicyId;

/// Errors produced by sweep components.
///
/// Every variant is fatal to the run that raised it. Nothing in this crate
/// retries; the scheduling layer decides what to do on the next trigger.
#[derive(Debug, Error)]
pub enum SweepError {
    /// Live worker count could not be read.
    #[error("capacity registry error: {0}")]
    CapacityRegistry(String),
    /// Load sensor could not be consulted.
    #[error("load sensor error: {0}")]
    LoadSensor(String),
    /// Policy store query failed.
    #[error("policy store error: {0}")]
    PolicyStore(String),
    /// The work executor failed for a policy.
    #[error("executor failed for policy {policy}: {message}")]
    Executor {
        /// Policy being processed when the executor failed.
        policy: PolicyId,
        /// Rendered executor error chain.
        message: String,
    },
    /// The work executor reported more units than it was allowed.
    #[error("executor overran cap for policy {policy}: requested {requested}, produced {produced}")]
    ExecutorOverrun {
        /// Policy being processed.
        policy: PolicyId,
        /// Cap handed to the executor.
        requested: u32,
        /// Units the executor claimed to have produced.
        produced: u32,
    },
    /// Cursor slot could not be read or written.
    #[error("cursor store error: {0}")]
    CursorStore(String),
    /// Run lock could not be acquired or released.
    #[error("run lock error: {0}")]
    Lock(String),
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
