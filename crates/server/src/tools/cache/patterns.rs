//! cache_patterns tool implementation.
//!
//! Registers whitelist/blacklist patterns and reports the active lists.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use offcache_core::{CacheEngine, Error};

use crate::tools::json_result;

/// Parameters for the cache_patterns tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CachePatternsParams {
    /// Regex patterns to add to the whitelist.
    #[serde(default)]
    pub whitelist: Vec<String>,

    /// Regex patterns to add to the blacklist.
    #[serde(default)]
    pub blacklist: Vec<String>,
}

/// A pattern that failed to compile.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RejectedPattern {
    pub pattern: String,
    pub reason: String,
}

/// Output from the cache_patterns tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePatternsOutput {
    /// Active whitelist after registration.
    pub whitelist: Vec<String>,
    /// Active blacklist after registration.
    pub blacklist: Vec<String>,
    pub rejected: Vec<RejectedPattern>,
}

fn rejected(err: Error) -> RejectedPattern {
    match err {
        Error::InvalidPattern { pattern, reason } => RejectedPattern { pattern, reason },
        other => RejectedPattern { pattern: String::new(), reason: other.to_string() },
    }
}

/// Implementation of the cache_patterns tool.
///
/// A bad pattern is reported and skipped; the remaining patterns still register.
pub async fn patterns_impl(engine: &CacheEngine, params: CachePatternsParams) -> Result<CallToolResult, McpError> {
    let mut rejects = Vec::new();

    for pattern in &params.whitelist {
        if let Err(err) = engine.add_whitelist_pattern(pattern) {
            rejects.push(rejected(err));
        }
    }
    for pattern in &params.blacklist {
        if let Err(err) = engine.add_blacklist_pattern(pattern) {
            rejects.push(rejected(err));
        }
    }

    let patterns = engine.registry().patterns();
    json_result(&CachePatternsOutput {
        whitelist: patterns.whitelist(),
        blacklist: patterns.blacklist(),
        rejected: rejects,
    })
}
