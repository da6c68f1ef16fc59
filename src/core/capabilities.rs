//! Capability traits for the collaborators a sweep depends on.
//!
//! Every external system the sweeper talks to is injected through one of
//! these traits so tests can substitute deterministic fakes.

use std::time::Duration;

use async_trait::async_trait;

use super::{Policy, PolicyId, PolicyScope, SweepError};

/// Ordered, filterable view over the policy collection.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Fetch the next page of enabled policies matching `scope`.
    ///
    /// Results must be in ascending id order, contain only ids strictly
    /// greater than `after` (when given), and hold at most `limit` entries.
    /// A page shorter than `limit` signals the end of the scope.
    async fn fetch_page(
        &self,
        scope: &PolicyScope,
        after: Option<PolicyId>,
        limit: usize,
    ) -> Result<Vec<Policy>, SweepError>;
}

/// Live view of downstream worker capacity.
#[async_trait]
pub trait CapacityRegistry: Send + Sync {
    /// Number of workers currently consuming `queue`.
    async fn live_worker_count(&self, queue: &str) -> Result<u32, SweepError>;
}

/// System load signal able to veto a run.
#[async_trait]
pub trait LoadSensor: Send + Sync {
    /// True if the system is too busy for a sweep right now.
    async fn is_overloaded(&self) -> Result<bool, SweepError>;
}

/// Small persisted key/value slot with expiry holding the resumption cursor.
#[async_trait]
pub trait CursorStore: Send + Sync {
    /// Read the cursor stored under `key`, if present and not expired.
    async fn get(&self, key: &str) -> Result<Option<PolicyId>, SweepError>;
    /// Store `id` under `key` for `ttl`.
    async fn set(&self, key: &str, id: PolicyId, ttl: Duration) -> Result<(), SweepError>;
    /// Remove the cursor stored under `key`.
    async fn delete(&self, key: &str) -> Result<(), SweepError>;
}

/// Token proving ownership of a run lock lease.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaseToken(pub String);

/// Run-level mutual exclusion with lease semantics.
///
/// Leases expire after their TTL so a crashed holder cannot block sweeps
/// forever.
#[async_trait]
pub trait RunLock: Send + Sync {
    /// Try to take the lock. Returns `None` if another holder has a live lease.
    async fn try_acquire(&self, key: &str, ttl: Duration) -> Result<Option<LeaseToken>, SweepError>;
    /// Release a lease. Returns `false` if the lease had already expired or
    /// was taken over.
    async fn release(&self, key: &str, token: &LeaseToken) -> Result<bool, SweepError>;
}
