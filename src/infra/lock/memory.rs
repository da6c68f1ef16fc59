//! In-memory run lock with lease expiry.
//!
//! Only coordinates callers inside one process; multi-node deployments need a
//! shared backend (Postgres advisory lock, Redis `SET NX PX`).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::core::{LeaseToken, RunLock, SweepError};

struct Lease {
    token: LeaseToken,
    expires_at: Instant,
}

/// Process-local lease lock.
#[derive(Default)]
pub struct InMemoryRunLock {
    leases: Mutex<HashMap<String, Lease>>,
}

impl InMemoryRunLock {
    /// Create a lock with no leases held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `key` currently has a live lease.
    #[must_use]
    pub fn is_held(&self, key: &str) -> bool {
        self.leases
            .lock()
            .get(key)
            .is_some_and(|lease| lease.expires_at > Instant::now())
    }
}

#[async_trait]
impl RunLock for InMemoryRunLock {
    async fn try_acquire(&self, key: &str, ttl: Duration) -> Result<Option<LeaseToken>, SweepError> {
        let now = Instant::now();
        let mut leases = self.leases.lock();
        if leases.get(key).is_some_and(|lease| lease.expires_at > now) {
            return Ok(None);
        }
        let expires_at = now
            .checked_add(ttl)
            .ok_or_else(|| SweepError::Lock(format!("lease ttl {ttl:?} out of range")))?;
        let token = LeaseToken(Uuid::new_v4().to_string());
        leases.insert(
            key.to_string(),
            Lease {
                token: token.clone(),
                expires_at,
            },
        );
        drop(leases);
        Ok(Some(token))
    }

    async fn release(&self, key: &str, token: &LeaseToken) -> Result<bool, SweepError> {
        let mut leases = self.leases.lock();
        let owned = leases
            .get(key)
            .is_some_and(|lease| &lease.token == token && lease.expires_at > Instant::now());
        if owned {
            leases.remove(key);
        }
        Ok(owned)
    }
}
