use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

// Keys share the application prefix so unrelated data in the same directory
// is never touched.
pub const KEY_FAVORITES: &str = "gametrail-favorites";
pub const KEY_RECENT: &str = "gametrail-recent";
pub const KEY_PREFERENCES: &str = "gametrail-preferences";
pub const KEY_SESSION_USER: &str = "gametrail-user";
pub const KEY_SESSION_TOKEN: &str = "gametrail-token";
pub const KEY_USER_TABLE: &str = "gametrail-users";
pub const KEY_SCORE_LOG: &str = "gametrail-scores";

/// Durable key-value storage scoped to the local user profile.
///
/// Survives restarts but carries no cross-device guarantees. Each key maps
/// to a `<key>.json` file under the store directory.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn open(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create store directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Read a stored value. Never fails: a missing key or an unreadable or
    /// unparseable file yields the type's default.
    pub fn read<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.try_read(key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                debug!(key = key, error = %e, "Unreadable stored value, using default");
                T::default()
            }
        }
    }

    fn try_read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read stored value for {}", key))?;
        let value = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse stored value for {}", key))?;
        Ok(Some(value))
    }

    /// Persist a value. Failures are logged and swallowed; the previously
    /// stored value stays intact and the next successful write re-establishes
    /// correct state.
    pub fn write<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.try_write(key, value) {
            warn!(key = key, error = %e, "Failed to persist value, keeping previous data");
        }
    }

    /// Fallible write path, exposed for callers that need to observe storage
    /// failures directly.
    pub fn try_write<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let contents = serde_json::to_string_pretty(value)
            .with_context(|| format!("Failed to serialize value for {}", key))?;

        // Stage through a temp file so a failed write cannot clobber the
        // previous value.
        let path = self.key_path(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)
            .with_context(|| format!("Failed to write staging file for {}", key))?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace stored value for {}", key))?;
        Ok(())
    }

    /// Delete a key. Idempotent; removing an absent key is a no-op.
    pub fn remove(&self, key: &str) {
        let path = self.key_path(key);
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!(key = key, error = %e, "Failed to remove stored value");
            }
        }
    }
}
