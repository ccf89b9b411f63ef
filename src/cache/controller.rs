use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use futures::stream::{self, StreamExt};
use reqwest::Method;
use tracing::{debug, info, warn};

use super::bucket::{CacheBucket, StoredResponse};
use super::fetch::{Destination, Fetch, FetchRequest, FetchResponse};

// ============================================================================
// Constants
// ============================================================================

// Bucket names carry a version suffix; bump it to force-evict stale buckets
// on deploy.
pub const PAGE_CACHE: &str = "gametrail-v1";
pub const STATIC_CACHE: &str = "gametrail-static-v1";
pub const API_CACHE: &str = "gametrail-api-v1";

/// Buckets the current build knows about. Activation deletes everything else.
const CURRENT_BUCKETS: [&str; 3] = [PAGE_CACHE, STATIC_CACHE, API_CACHE];

/// Root-relative paths guaranteed cached on install.
const PRECACHE_MANIFEST: [&str; 4] = ["/", "/site.webmanifest", "/robots.txt", "/sitemap.xml"];

/// Path prefix routed through the network-first API strategy.
const API_PREFIX: &str = "/api/";

/// File extensions served cache-first from the static bucket.
const STATIC_EXTENSIONS: [&str; 10] = [
    "js", "css", "woff", "woff2", "png", "jpg", "jpeg", "gif", "svg", "ico",
];

/// Maximum concurrent pre-cache fetches during install.
const MAX_CONCURRENT_PRECACHE: usize = 4;

// ============================================================================
// Request classification
// ============================================================================

/// Which caching strategy a request gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// Not intercepted; fetched directly with no caching.
    Passthrough,
    /// Network-first with cache fallback.
    Api,
    /// Cache-first.
    StaticAsset,
    /// Network-first with offline fallback to the cached root document.
    Document,
}

/// Classify a request. Evaluation order is fixed: method, API prefix,
/// static extension, document destination.
pub fn classify(request: &FetchRequest) -> RequestClass {
    if request.method != Method::GET {
        return RequestClass::Passthrough;
    }
    if request.path.starts_with(API_PREFIX) {
        return RequestClass::Api;
    }
    if has_static_extension(&request.path) {
        return RequestClass::StaticAsset;
    }
    if request.destination == Destination::Document {
        return RequestClass::Document;
    }
    RequestClass::Passthrough
}

fn has_static_extension(path: &str) -> bool {
    // The query string is not part of the extension
    let path = path.split('?').next().unwrap_or(path);
    match path.rsplit_once('.') {
        Some((_, ext)) => STATIC_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

// ============================================================================
// Controller
// ============================================================================

/// Serves same-origin requests through per-class caching strategies.
///
/// Runs independently of the page-side managers; each request is one
/// classify + fetch + optional-store chain, and concurrent requests to
/// different paths never interact. Two in-flight requests for the same path
/// may race on the store step, which resolves last-write-wins.
pub struct CacheController<F: Fetch> {
    fetcher: F,
    root: PathBuf,
    pages: CacheBucket,
    statics: CacheBucket,
    api: CacheBucket,
}

impl<F: Fetch> CacheController<F> {
    pub fn new(root: PathBuf, fetcher: F) -> Result<Self> {
        std::fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create cache root {}", root.display()))?;
        let pages = CacheBucket::open(&root, PAGE_CACHE)?;
        let statics = CacheBucket::open(&root, STATIC_CACHE)?;
        let api = CacheBucket::open(&root, API_CACHE)?;
        Ok(Self {
            fetcher,
            root,
            pages,
            statics,
            api,
        })
    }

    /// The underlying network seam, mainly for tests and diagnostics.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    // ===== Lifecycle =====

    /// Pre-populate the static bucket with the fixed asset manifest.
    /// Any manifest fetch failure fails the install.
    pub async fn install(&self) -> Result<()> {
        let results: Vec<Result<()>> = stream::iter(PRECACHE_MANIFEST)
            .map(|path| self.precache_asset(path))
            .buffer_unordered(MAX_CONCURRENT_PRECACHE)
            .collect()
            .await;
        results.into_iter().collect::<Result<()>>()?;

        info!(assets = PRECACHE_MANIFEST.len(), "Static pre-cache installed");
        Ok(())
    }

    async fn precache_asset(&self, path: &str) -> Result<()> {
        let request = FetchRequest::get(path);
        let response = self.fetcher.fetch(&request).await?;
        if !response.is_success() {
            bail!("Pre-cache fetch for {} returned status {}", path, response.status);
        }
        self.statics
            .put(path, &StoredResponse::from_response(&response))
            .with_context(|| format!("Failed to store pre-cached asset {}", path))
    }

    /// Delete cache buckets that are no longer in the current set, keeping
    /// deploys from accumulating stale data.
    pub fn activate(&self) -> Result<()> {
        let entries = std::fs::read_dir(&self.root).context("Failed to enumerate cache buckets")?;
        for entry in entries {
            let entry = entry.context("Failed to read cache root entry")?;
            if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if !CURRENT_BUCKETS.contains(&name.as_str()) {
                info!(bucket = %name, "Deleting stale cache bucket");
                std::fs::remove_dir_all(entry.path())
                    .with_context(|| format!("Failed to delete stale bucket {}", name))?;
            }
        }
        Ok(())
    }

    // ===== Request handling =====

    /// Serve one request with the strategy its class calls for.
    pub async fn handle(&self, request: &FetchRequest) -> Result<FetchResponse> {
        match classify(request) {
            RequestClass::Api => self.network_first(request).await,
            RequestClass::StaticAsset => self.cache_first(request).await,
            RequestClass::Document => self.network_first_document(request).await,
            RequestClass::Passthrough => self.fetcher.fetch(request).await,
        }
    }

    async fn network_first(&self, request: &FetchRequest) -> Result<FetchResponse> {
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.is_success() {
                    self.store(&self.api, &request.path, &response);
                }
                Ok(response)
            }
            Err(err) => match self.api.get(&request.path) {
                Some(cached) => {
                    debug!(path = %request.path, "Network failed, serving API response from cache");
                    Ok(cached.into_response())
                }
                None => Err(err),
            },
        }
    }

    async fn cache_first(&self, request: &FetchRequest) -> Result<FetchResponse> {
        if let Some(cached) = self.statics.get(&request.path) {
            return Ok(cached.into_response());
        }
        let response = self.fetcher.fetch(request).await?;
        if response.is_success() {
            self.store(&self.statics, &request.path, &response);
        }
        Ok(response)
    }

    async fn network_first_document(&self, request: &FetchRequest) -> Result<FetchResponse> {
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.is_success() {
                    self.store(&self.pages, &request.path, &response);
                }
                Ok(response)
            }
            Err(err) => {
                // Exact page first, then the pre-cached root document
                let fallback = self
                    .lookup_page(&request.path)
                    .or_else(|| self.lookup_page("/"));
                match fallback {
                    Some(cached) => {
                        debug!(path = %request.path, "Network failed, serving cached document");
                        Ok(cached.into_response())
                    }
                    None => Err(err),
                }
            }
        }
    }

    /// Documents can live in the page bucket or, for pre-cached paths like
    /// the root document, in the static bucket.
    fn lookup_page(&self, path: &str) -> Option<StoredResponse> {
        self.pages.get(path).or_else(|| self.statics.get(path))
    }

    /// Best-effort store: a failed cache write never fails the request.
    fn store(&self, bucket: &CacheBucket, path: &str, response: &FetchResponse) {
        if let Err(e) = bucket.put(path, &StoredResponse::from_response(response)) {
            warn!(bucket = bucket.name(), path = path, error = %e, "Failed to cache response");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_priority_order() {
        assert_eq!(
            classify(&FetchRequest {
                method: Method::POST,
                path: "/api/auth/login".to_string(),
                destination: Destination::Other,
            }),
            RequestClass::Passthrough
        );
        assert_eq!(
            classify(&FetchRequest::get("/api/leaderboard/global")),
            RequestClass::Api
        );
        assert_eq!(
            classify(&FetchRequest::get("/styles/app.css")),
            RequestClass::StaticAsset
        );
        assert_eq!(
            classify(&FetchRequest::document("/games/addition-race")),
            RequestClass::Document
        );
        // GET, not API, no extension, not a navigation
        assert_eq!(
            classify(&FetchRequest::get("/games/addition-race")),
            RequestClass::Passthrough
        );
    }

    #[test]
    fn test_api_prefix_beats_extension() {
        // An API path ending in a static-looking extension is still API
        assert_eq!(
            classify(&FetchRequest::get("/api/assets/logo.png")),
            RequestClass::Api
        );
    }

    #[test]
    fn test_static_extension_matching() {
        assert!(has_static_extension("/app.js"));
        assert!(has_static_extension("/fonts/inter.WOFF2"));
        assert!(has_static_extension("/styles/app.css?v=3"));
        assert!(!has_static_extension("/games/addition-race"));
        assert!(!has_static_extension("/archive.tar.gz"));
        assert!(!has_static_extension("/"));
    }
}
