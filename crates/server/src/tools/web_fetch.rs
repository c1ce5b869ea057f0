//! web_fetch tool implementation.
//!
//! Serves a URL through the cache engine: from the cache while the entry is
//! usable, from the network otherwise.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use offcache_core::{CacheEngine, CacheRequest, CachedResponse, EntryState, ResponseSource};

use super::json_result;

/// Input parameters for web_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebFetchParams {
    /// The URL to fetch.
    pub url: String,

    /// HTTP method (default: GET). Only GET responses are cached.
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_method() -> String {
    "GET".into()
}

/// Output structure for web_fetch tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct WebFetchOutput {
    pub url: String,
    /// Cache key, absent when the request bypassed the cache.
    pub key: Option<String>,
    pub status: u16,
    pub content_type: Option<String>,
    /// Where the body came from: cache, network, or bypass.
    pub source: ResponseSource,
    /// State of the cache entry when the request arrived.
    pub state: EntryState,
    /// RFC3339 time the served entry was stored.
    pub stored_at: Option<String>,
    pub headers: Vec<(String, String)>,
    /// Body length in bytes.
    pub bytes: usize,
    /// Body as UTF-8 text; absent for binary bodies.
    pub body: Option<String>,
}

impl From<CachedResponse> for WebFetchOutput {
    fn from(response: CachedResponse) -> Self {
        let body = std::str::from_utf8(&response.body).ok().map(str::to_string);
        Self {
            url: response.url,
            key: response.key.map(|k| k.to_string()),
            status: response.status,
            content_type: response.content_type,
            source: response.source,
            state: response.state,
            stored_at: response.stored_at.map(|at| at.to_rfc3339()),
            headers: response.headers,
            bytes: response.body.len(),
            body,
        }
    }
}

/// Implementation of the web_fetch tool.
pub async fn fetch_impl(engine: &CacheEngine, params: WebFetchParams) -> Result<CallToolResult, McpError> {
    let request = CacheRequest::new(params.method, params.url);
    let response = engine.lookup_or_fetch(&request).await?;
    json_result(&WebFetchOutput::from(response))
}
