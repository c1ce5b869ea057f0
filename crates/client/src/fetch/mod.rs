//! HTTP transport for the cache engine.
//!
//! - Any HTTP status is returned as a response; the engine decides what to store
//! - Only transport failures (DNS, connect, timeout, oversized body) are errors
//! - Max redirects: 5
//! - Max body bytes: 5MB (configurable)

mod error;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Method, Url};

use offcache_core::{AppConfig, Error, FetchedResponse, Fetcher};

pub use error::FetchError;

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "offcache/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "offcache/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            max_redirects: config.max_redirects,
        }
    }
}

pub(crate) fn build_client(config: &FetchConfig) -> Result<Client, FetchError> {
    Client::builder()
        .user_agent(&config.user_agent)
        .timeout(config.timeout)
        .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
        .use_rustls_tls()
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
        .map_err(|e| FetchError::Client(e.to_string()))
}

/// reqwest-backed [`Fetcher`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = build_client(&config)?;
        Ok(Self { http, config })
    }

    async fn send(&self, method: &str, url: &Url) -> Result<FetchedResponse, FetchError> {
        let start = Instant::now();
        let method =
            Method::from_bytes(method.as_bytes()).map_err(|_| FetchError::InvalidMethod(method.to_string()))?;

        let response = self.http.request(method.clone(), url.clone()).send().await?;

        let status = response.status().as_u16();
        if let Some(len) = response.content_length()
            && len > self.config.max_bytes as u64
        {
            return Err(FetchError::TooLarge { len: len as usize, max: self.config.max_bytes });
        }

        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = response.bytes().await?;
        if body.len() > self.config.max_bytes {
            return Err(FetchError::TooLarge { len: body.len(), max: self.config.max_bytes });
        }

        tracing::debug!(
            method = %method,
            url = %url,
            status,
            bytes = body.len(),
            fetch_ms = start.elapsed().as_millis() as u64,
            "fetched"
        );

        Ok(FetchedResponse { status, headers, body })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, method: &str, url: &Url) -> Result<FetchedResponse, Error> {
        self.send(method, url).await.map_err(Error::from)
    }
}
