//! In-memory cursor slot with expiry.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::{CursorStore, PolicyId, SweepError};

struct CursorEntry {
    id: PolicyId,
    expires_at: Instant,
}

/// Cursor store for development and tests. Entries expire like a cache key.
#[derive(Default)]
pub struct InMemoryCursorStore {
    entries: Mutex<HashMap<String, CursorEntry>>,
}

impl InMemoryCursorStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CursorStore for InMemoryCursorStore {
    async fn get(&self, key: &str) -> Result<Option<PolicyId>, SweepError> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if Instant::now() >= entry.expires_at => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.id)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, id: PolicyId, ttl: Duration) -> Result<(), SweepError> {
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or_else(|| SweepError::CursorStore(format!("ttl {ttl:?} out of range")))?;
        self.entries
            .lock()
            .insert(key.to_string(), CursorEntry { id, expires_at });
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SweepError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}
