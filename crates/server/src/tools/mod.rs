//! MCP tool implementations.
//!
//! This module contains all tools exposed by the offcache-mcp server.

pub mod cache;
pub mod web_fetch;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

use offcache_core::Error;

pub use cache::{
    CacheConnectivityParams, CacheGetParams, CachePatternsParams, CachePolicyParams, CachePurgeParams,
};
pub use web_fetch::WebFetchParams;

/// Render a tool output as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
