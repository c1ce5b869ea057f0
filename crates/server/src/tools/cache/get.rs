//! cache_get tool implementation.
//!
//! Retrieves a cached entry's metadata by key or by URL, without fetching.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use offcache_core::{CacheEngine, CacheKey, EntryState, Error};

use crate::tools::json_result;

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// The 64-character hex key of the cached entry.
    pub key: Option<String>,

    /// URL of the cached entry, as passed to web_fetch. Alternative to `key`.
    pub url: Option<String>,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CacheGetOutput {
    pub key: String,
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    /// RFC3339 time the entry was stored.
    pub stored_at: String,
    /// Freshness of the entry right now.
    pub state: EntryState,
    pub headers: Vec<(String, String)>,
    pub bytes: usize,
}

/// Implementation of the cache_get tool.
pub async fn get_impl(engine: &CacheEngine, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    let (entry, requested) = match (params.key, params.url) {
        (Some(key), None) => (engine.entries().get(&CacheKey::parse(&key)?).await?, key),
        (None, Some(url)) => (engine.cached(&url).await?, url),
        _ => return Err(Error::InvalidInput("Exactly one of key or url must be specified".to_string()).into()),
    };
    let entry = entry.ok_or(Error::CacheMiss(requested))?;

    let state = engine
        .registry()
        .policy()
        .state_of(entry.content_type.as_deref(), entry.stored_at, engine.clock().now());

    let output = CacheGetOutput {
        key: entry.key.to_string(),
        url: entry.url,
        status: entry.status_code,
        content_type: entry.content_type,
        stored_at: entry.stored_at.to_rfc3339(),
        state,
        headers: entry.headers,
        bytes: entry.payload.len(),
    };
    json_result(&output)
}
