//! File-backed store for the working copy and preferences.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::models::StoredWorkingCopy;
use crate::domain::{Listing, Preferences};
use crate::error::ConsoleError;

const LISTINGS_FILE: &str = "listings.json";
const PREFERENCES_FILE: &str = "preferences.json";

/// JSON documents under a state directory.
///
/// A disabled store loads defaults and discards writes.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: Option<PathBuf>,
}

impl LocalStore {
    /// Store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Store that never touches the filesystem.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { dir: None }
    }

    /// Returns `true` if writes reach the filesystem.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.dir.is_some()
    }

    /// Loads the persisted working copy, or an empty one.
    pub async fn load_listings(&self) -> Vec<Listing> {
        self.load::<StoredWorkingCopy>(LISTINGS_FILE)
            .await
            .map(|stored| stored.listings)
            .unwrap_or_default()
    }

    /// Persists the working copy.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::PersistenceError`] if the file cannot be
    /// written.
    pub async fn save_listings(&self, listings: Vec<Listing>) -> Result<(), ConsoleError> {
        let document = StoredWorkingCopy {
            saved_at: Utc::now(),
            listings,
        };
        self.save(LISTINGS_FILE, &document).await
    }

    /// Loads the persisted preferences, or the defaults.
    pub async fn load_preferences(&self) -> Preferences {
        self.load(PREFERENCES_FILE).await.unwrap_or_default()
    }

    /// Persists the preferences.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::PersistenceError`] if the file cannot be
    /// written.
    pub async fn save_preferences(&self, preferences: &Preferences) -> Result<(), ConsoleError> {
        self.save(PREFERENCES_FILE, preferences).await
    }

    async fn load<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let path = self.dir.as_deref()?.join(name);
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read state file");
                return None;
            }
        };
        match serde_json::from_slice(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt state file");
                None
            }
        }
    }

    async fn save<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<(), ConsoleError> {
        let Some(dir) = self.dir.as_deref() else {
            return Ok(());
        };
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| ConsoleError::PersistenceError(e.to_string()))?;
        tokio::fs::create_dir_all(dir).await?;
        write_atomically(&dir.join(name), &bytes).await?;
        tracing::debug!(file = name, bytes = bytes.len(), "state saved");
        Ok(())
    }
}

/// Writes to a temp file unique to this call, then renames it over `path`.
/// Concurrent saves of one document never share a temp file; the last
/// rename wins.
async fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(format!(".{}.tmp", Uuid::new_v4()));
    let tmp = PathBuf::from(tmp);
    let written = match tokio::fs::write(&tmp, bytes).await {
        Ok(()) => tokio::fs::rename(&tmp, path).await,
        Err(e) => Err(e),
    };
    if written.is_err() {
        let _ = tokio::fs::remove_file(&tmp).await;
    }
    written
}
