use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::fetch::FetchResponse;

/// A response copy held in a cache bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub stored_at: DateTime<Utc>,
}

impl StoredResponse {
    pub fn from_response(response: &FetchResponse) -> Self {
        Self {
            status: response.status,
            content_type: response.content_type.clone(),
            body: response.body.clone(),
            stored_at: Utc::now(),
        }
    }

    pub fn into_response(self) -> FetchResponse {
        FetchResponse {
            status: self.status,
            content_type: self.content_type,
            body: self.body,
        }
    }
}

/// On-disk entry format; carries the request path so a filename hash
/// collision can never serve the wrong response.
#[derive(Debug, Serialize, Deserialize)]
struct Entry {
    path: String,
    response: StoredResponse,
}

/// A named, independently evictable partition of cached responses.
///
/// Entries are keyed by request path, one JSON file each. Writing the same
/// path twice replaces the entry whole, so concurrent stores for one URL
/// resolve last-write-wins rather than corrupting.
#[derive(Debug)]
pub struct CacheBucket {
    name: String,
    dir: PathBuf,
}

impl CacheBucket {
    pub fn open(root: &Path, name: &str) -> Result<Self> {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create cache bucket {}", name))?;
        Ok(Self {
            name: name.to_string(),
            dir,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn entry_path(&self, request_path: &str) -> PathBuf {
        let mut hasher = DefaultHasher::new();
        request_path.hash(&mut hasher);
        self.dir.join(format!("{:016x}.json", hasher.finish()))
    }

    /// Look up the cached response for a request path. Unreadable or
    /// mismatched entries count as misses.
    pub fn get(&self, request_path: &str) -> Option<StoredResponse> {
        let path = self.entry_path(request_path);
        if !path.exists() {
            return None;
        }

        let parsed: Result<Entry> = std::fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|contents| serde_json::from_str(&contents).map_err(anyhow::Error::from));

        match parsed {
            Ok(entry) if entry.path == request_path => Some(entry.response),
            Ok(entry) => {
                debug!(
                    bucket = %self.name,
                    expected = request_path,
                    found = %entry.path,
                    "Cache entry filename collision, treating as miss"
                );
                None
            }
            Err(e) => {
                debug!(bucket = %self.name, path = request_path, error = %e, "Discarding unreadable cache entry");
                None
            }
        }
    }

    /// Store a response copy for a request path, replacing any previous one.
    pub fn put(&self, request_path: &str, response: &StoredResponse) -> Result<()> {
        let entry = Entry {
            path: request_path.to_string(),
            response: response.clone(),
        };
        let contents = serde_json::to_string(&entry)
            .with_context(|| format!("Failed to serialize cache entry for {}", request_path))?;
        std::fs::write(self.entry_path(request_path), contents)
            .with_context(|| format!("Failed to write cache entry for {}", request_path))?;
        Ok(())
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        std::fs::read_dir(&self.dir)
            .map(|entries| entries.filter_map(|e| e.ok()).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
