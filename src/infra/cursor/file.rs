//! File-backed cursor slot.
//!
//! Each key is stored as a small JSON document next to its expiry, so the
//! cursor survives restarts of a single-node deployment.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::{CursorStore, PolicyId, SweepError};
use crate::util::clock::{expires_at_ms, now_ms};

#[derive(Debug, Serialize, Deserialize)]
struct StoredCursor {
    policy_id: PolicyId,
    expires_at_ms: u128,
}

/// Cursor store writing one JSON file per key under a directory.
pub struct FileCursorStore {
    dir: PathBuf,
}

impl FileCursorStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::CursorStore`] if the directory cannot be created.
    pub async fn new(dir: impl AsRef<Path>) -> Result<Self, SweepError> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| SweepError::CursorStore(e.to_string()))?;
        Ok(Self { dir })
    }

    fn file_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }

    async fn remove_file(path: &Path) -> Result<(), SweepError> {
        match tokio::fs::remove_file(path).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(SweepError::CursorStore(e.to_string())),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl CursorStore for FileCursorStore {
    async fn get(&self, key: &str) -> Result<Option<PolicyId>, SweepError> {
        let path = self.file_path(key);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SweepError::CursorStore(e.to_string())),
        };
        let stored: StoredCursor =
            serde_json::from_str(&raw).map_err(|e| SweepError::CursorStore(e.to_string()))?;
        if now_ms() >= stored.expires_at_ms {
            Self::remove_file(&path).await?;
            return Ok(None);
        }
        Ok(Some(stored.policy_id))
    }

    async fn set(&self, key: &str, id: PolicyId, ttl: Duration) -> Result<(), SweepError> {
        let path = self.file_path(key);
        let stored = StoredCursor {
            policy_id: id,
            expires_at_ms: expires_at_ms(ttl),
        };
        let body =
            serde_json::to_string(&stored).map_err(|e| SweepError::CursorStore(e.to_string()))?;
        // Write-then-rename so readers never see a torn file.
        let tmp = path.with_extension("json.tmp");
        if let Err(e) = tokio::fs::write(&tmp, body).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(SweepError::CursorStore(e.to_string()));
        }
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                tracing::warn!(path = ?tmp, error = %cleanup, "failed to remove temporary cursor file");
            }
            return Err(SweepError::CursorStore(e.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SweepError> {
        Self::remove_file(&self.file_path(key)).await
    }
}
