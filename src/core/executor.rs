//! Per-policy work executor abstraction.

use async_trait::async_trait;

use super::{AppResult, Policy};

/// Performs bounded cleanup work for a single policy.
///
/// The executor owns the business logic: deleting expired content for the
/// account behind `policy`. The sweeper only cares how many units of work were
/// actually done.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use prometheus_sweeper::core::{AppResult, Policy, PolicyExecutor};
///
/// struct PurgeExpiredMessages {
///     client: MessagesClient,
/// }
///
/// #[async_trait]
/// impl PolicyExecutor for PurgeExpiredMessages {
///     async fn apply(&self, policy: &Policy, cap_units: u32) -> AppResult<u32> {
///         let deleted = self.client.purge(policy.id.get(), cap_units).await?;
///         Ok(deleted)
///     }
/// }
/// ```
#[async_trait]
pub trait PolicyExecutor: Send + Sync {
    /// Perform at most `cap_units` units of work for `policy`.
    ///
    /// # Returns
    ///
    /// Units of work actually performed. May be anything from `0` to
    /// `cap_units`; reporting more than `cap_units` aborts the run.
    ///
    /// # Errors
    ///
    /// Any error is fatal to the current run and is not retried.
    async fn apply(&self, policy: &Policy, cap_units: u32) -> AppResult<u32>;
}
