//! Offline caching for page, static-asset, and API requests.
//!
//! The `CacheController` stands between the application and the network.
//! Every outgoing request is classified into one of four buckets and served
//! with the matching strategy:
//!
//! - API requests: network-first with cache fallback
//! - static assets: cache-first
//! - document navigations: network-first with offline fallback to the
//!   cached root document
//! - everything else: passed through untouched
//!
//! Responses are kept in three named, versioned cache buckets that can be
//! evicted independently; `install` pre-populates the static bucket and
//! `activate` deletes buckets left behind by previous versions.

pub mod bucket;
pub mod controller;
pub mod fetch;

pub use bucket::{CacheBucket, StoredResponse};
pub use controller::{classify, CacheController, RequestClass, API_CACHE, PAGE_CACHE, STATIC_CACHE};
pub use fetch::{Destination, Fetch, FetchRequest, FetchResponse, HttpFetcher};
