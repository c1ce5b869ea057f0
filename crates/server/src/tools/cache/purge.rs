//! cache_purge tool implementation.
//!
//! Purges cache entries: everything, by age, or by expiration policy.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use offcache_core::{CacheEngine, Error};

use crate::tools::json_result;

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Purge every entry.
    #[serde(default)]
    pub all: bool,

    /// Purge entries stored more than this many seconds ago.
    pub older_than_secs: Option<u64>,

    /// Purge entries past their content type's expiration window.
    #[serde(default)]
    pub expired: bool,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries deleted.
    pub deleted: u64,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(engine: &CacheEngine, params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    if !params.all && params.older_than_secs.is_none() && !params.expired {
        return Err(
            Error::InvalidInput("At least one of all, older_than_secs, or expired must be specified".to_string()).into(),
        );
    }

    let cutoff = params
        .older_than_secs
        .map(|secs| {
            i64::try_from(secs)
                .ok()
                .and_then(chrono::Duration::try_seconds)
                .and_then(|age| engine.clock().now().checked_sub_signed(age))
                .ok_or_else(|| Error::InvalidInput(format!("older_than_secs out of range: {secs}")))
        })
        .transpose()?;

    let mut deleted = 0u64;

    if params.all {
        deleted += engine.remove_all().await?.removed;
    }

    if let Some(cutoff) = cutoff {
        deleted += engine.remove_older_than(cutoff).await?.removed;
    }

    if params.expired {
        deleted += engine.remove_expired().await?.removed;
    }

    json_result(&CachePurgeOutput { deleted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TestEngine, engine, output};
    use offcache_core::CacheRequest;
    use std::time::Duration;

    async fn seed(t: &TestEngine, path: &str, content_type: &str) {
        t.fetcher.push_ok(content_type, "body");
        let request = CacheRequest::get(format!("https://example.org/{path}"));
        t.engine.lookup_or_fetch(&request).await.unwrap();
    }

    fn deleted(result: &rmcp::model::CallToolResult) -> u64 {
        output(result)["deleted"].as_u64().unwrap()
    }

    #[tokio::test]
    async fn test_purge_all() {
        let t = engine();
        seed(&t, "a", "text/html").await;
        seed(&t, "b", "text/html").await;

        let params = CachePurgeParams { all: true, ..Default::default() };
        assert_eq!(deleted(&purge_impl(&t.engine, params).await.unwrap()), 2);
    }

    #[tokio::test]
    async fn test_purge_older_than() {
        let t = engine();
        seed(&t, "old", "text/html").await;
        t.clock.advance(chrono::Duration::seconds(100));
        seed(&t, "new", "text/html").await;

        let params = CachePurgeParams { older_than_secs: Some(50), ..Default::default() };
        assert_eq!(deleted(&purge_impl(&t.engine, params).await.unwrap()), 1);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let t = engine();
        t.engine.set_expiration_window("image/png", Duration::from_secs(10));
        seed(&t, "a.png", "image/png").await;
        seed(&t, "a.html", "text/html").await;
        t.clock.advance(chrono::Duration::seconds(11));

        let params = CachePurgeParams { expired: true, ..Default::default() };
        assert_eq!(deleted(&purge_impl(&t.engine, params).await.unwrap()), 1);
    }

    #[tokio::test]
    async fn test_purge_older_than_out_of_range() {
        let t = engine();
        seed(&t, "a", "text/html").await;

        for secs in [1u64 << 60, u64::MAX] {
            let params = CachePurgeParams { all: true, older_than_secs: Some(secs), ..Default::default() };
            let err = purge_impl(&t.engine, params).await.unwrap_err();
            assert_eq!(err.code.0, -32602);
        }
        assert_eq!(t.engine.entries().keys().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_purge_no_params() {
        let t = engine();
        let err = purge_impl(&t.engine, CachePurgeParams::default()).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }
}
