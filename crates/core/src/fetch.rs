//! Network collaborator interface.

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::Error;

/// A request handed to the engine by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRequest {
    pub url: String,
    pub method: String,
}

impl CacheRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self { url: url.into(), method: method.into().to_ascii_uppercase() }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    /// Only GET responses are ever cached.
    pub fn is_cacheable_method(&self) -> bool {
        self.method == "GET"
    }
}

/// A complete, fully buffered network response.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl FetchedResponse {
    /// First value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs the network round-trip for a request.
///
/// Implementations own timeouts and cancellation; the engine only sees the
/// outcome. Failures should be reported as [`Error::Network`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, method: &str, url: &Url) -> Result<FetchedResponse, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_method_normalized() {
        let req = CacheRequest::new("post", "https://example.org");
        assert_eq!(req.method, "POST");
        assert!(!req.is_cacheable_method());
        assert!(CacheRequest::get("https://example.org").is_cacheable_method());
    }

    #[test]
    fn test_header_lookup_case_insensitive() {
        let response = FetchedResponse {
            status: 200,
            headers: vec![("Content-Type".into(), "text/html".into())],
            body: Bytes::new(),
        };
        assert_eq!(response.content_type(), Some("text/html"));
        assert_eq!(response.header("x-missing"), None);
        assert!(response.is_success());
    }
}
