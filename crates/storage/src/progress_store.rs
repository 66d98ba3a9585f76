use std::fmt;
use std::sync::Arc;

use quiz_core::model::Progress;
use tracing::{debug, warn};

use crate::repository::{KeyValueStore, StorageError};

/// Base name of the progress entry; the schema version is appended.
pub const PROGRESS_KEY_BASE: &str = "quiz_progress";

/// Schema revision of the persisted progress blob.
///
/// Bump this whenever the record shape changes incompatibly. Data stored
/// under older keys is abandoned, never migrated.
pub const PROGRESS_SCHEMA_VERSION: u32 = 5;

/// Versioned key under which progress is stored, e.g. `quiz_progress_v5`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKey(String);

impl StorageKey {
    #[must_use]
    pub fn versioned(base: &str, version: u32) -> Self {
        Self(format!("{base}_v{version}"))
    }

    #[must_use]
    pub fn current() -> Self {
        Self::versioned(PROGRESS_KEY_BASE, PROGRESS_SCHEMA_VERSION)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Loads and saves the whole challenge progress as one JSON value.
#[derive(Clone)]
pub struct ProgressStore {
    kv: Arc<dyn KeyValueStore>,
    key: StorageKey,
}

impl ProgressStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>, key: StorageKey) -> Self {
        Self { kv, key }
    }

    #[must_use]
    pub fn key(&self) -> &StorageKey {
        &self.key
    }

    /// Load stored progress.
    ///
    /// Missing or malformed data yields empty progress; malformed data is
    /// logged at `warn`.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the value cannot be read, so callers
    /// never overwrite data they failed to see.
    pub async fn load(&self) -> Result<Progress, StorageError> {
        let Some(raw) = self.kv.get(self.key.as_str()).await? else {
            debug!(key = %self.key, "no stored progress");
            return Ok(Progress::new());
        };

        match serde_json::from_str::<Progress>(&raw) {
            Ok(progress) => {
                debug!(key = %self.key, completed = progress.completed_count(), "progress loaded");
                Ok(progress)
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "stored progress is malformed, starting empty");
                Ok(Progress::new())
            }
        }
    }

    /// Overwrite stored progress with `progress`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if encoding fails, or the backend's
    /// error if the value cannot be written.
    pub async fn save(&self, progress: &Progress) -> Result<(), StorageError> {
        let raw = serde_json::to_string(progress)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.kv.put(self.key.as_str(), &raw).await?;
        debug!(key = %self.key, bytes = raw.len(), "progress saved");
        Ok(())
    }

    /// Drop all stored progress for this key.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the entry cannot be removed.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.kv.remove(self.key.as_str()).await
    }
}
