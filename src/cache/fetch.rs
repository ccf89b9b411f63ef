use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client, Method};

/// HTTP request timeout in seconds.
/// 30s allows for slow responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// What the requesting context will do with the response. Only full-page
/// navigations are distinguished; everything else routes by path shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Destination {
    Document,
    #[default]
    Other,
}

/// A same-origin request as seen by the cache controller.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub method: Method,
    pub path: String,
    pub destination: Destination,
}

impl FetchRequest {
    /// A plain GET for a sub-resource (asset, API call).
    pub fn get(path: &str) -> Self {
        Self {
            method: Method::GET,
            path: path.to_string(),
            destination: Destination::Other,
        }
    }

    /// A GET navigation to a full page.
    pub fn document(path: &str) -> Self {
        Self {
            method: Method::GET,
            path: path.to_string(),
            destination: Destination::Document,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network seam for the cache controller.
///
/// Production code uses `HttpFetcher`; tests substitute scripted fakes so
/// strategies can be exercised without a live server.
pub trait Fetch: Send + Sync {
    fn fetch(&self, request: &FetchRequest)
        -> impl Future<Output = Result<FetchResponse>> + Send;
}

/// Fetches over HTTP against a configured origin.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    origin: String,
}

impl HttpFetcher {
    pub fn new(origin: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        let origin = origin.into().trim_end_matches('/').to_string();
        Ok(Self { client, origin })
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        let url = format!("{}{}", self.origin, request.path);
        let response = self
            .client
            .request(request.method.clone(), &url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", request.path))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        let body = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response body for {}", request.path))?
            .to_vec();

        Ok(FetchResponse {
            status,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_constructors() {
        let get = FetchRequest::get("/api/leaderboard/global");
        assert_eq!(get.method, Method::GET);
        assert_eq!(get.destination, Destination::Other);

        let nav = FetchRequest::document("/games/addition-race");
        assert_eq!(nav.destination, Destination::Document);
    }

    #[test]
    fn test_is_success_bounds() {
        let mut response = FetchResponse {
            status: 200,
            content_type: None,
            body: vec![],
        };
        assert!(response.is_success());
        response.status = 299;
        assert!(response.is_success());
        response.status = 304;
        assert!(!response.is_success());
        response.status = 404;
        assert!(!response.is_success());
    }

    #[test]
    fn test_origin_trailing_slash_is_trimmed() {
        let fetcher = HttpFetcher::new("http://localhost:3000/").expect("Failed to build fetcher");
        assert_eq!(fetcher.origin, "http://localhost:3000");
    }
}
