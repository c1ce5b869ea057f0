//! cache_policy tool implementation.
//!
//! Sets staleness/expiration windows for a content type and reports the
//! windows now in effect for it.

use std::time::Duration;

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use offcache_core::CacheEngine;
use offcache_core::policy::classify;

use crate::tools::json_result;

/// Parameters for the cache_policy tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePolicyParams {
    /// Content type the windows apply to, e.g. "text/html". Parameters are ignored.
    pub classifier: String,

    /// Seconds after which entries of this type are stale.
    pub staleness_secs: Option<u64>,

    /// Seconds after which entries of this type are expired.
    pub expiration_secs: Option<u64>,
}

/// Output from the cache_policy tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePolicyOutput {
    /// Normalized classifier.
    pub classifier: String,
    /// Effective staleness window; null means never stale.
    pub staleness_secs: Option<u64>,
    /// Effective expiration window; null means never expires.
    pub expiration_secs: Option<u64>,
}

/// Implementation of the cache_policy tool.
pub async fn policy_impl(engine: &CacheEngine, params: CachePolicyParams) -> Result<CallToolResult, McpError> {
    if let Some(secs) = params.staleness_secs {
        engine.set_staleness_window(&params.classifier, Duration::from_secs(secs));
    }
    if let Some(secs) = params.expiration_secs {
        engine.set_expiration_window(&params.classifier, Duration::from_secs(secs));
    }

    let classifier = classify(Some(&params.classifier));
    let policy = engine.registry().policy();
    if params.staleness_secs.is_some() || params.expiration_secs.is_some() {
        tracing::info!(
            classifier = %classifier,
            staleness_secs = ?params.staleness_secs,
            expiration_secs = ?params.expiration_secs,
            "updated cache policy"
        );
    }

    json_result(&CachePolicyOutput {
        staleness_secs: policy.staleness(&classifier).as_secs(),
        expiration_secs: policy.expiration(&classifier).as_secs(),
        classifier,
    })
}
