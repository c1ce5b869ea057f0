//! cache_connectivity tool implementation.
//!
//! Lets the host override the online/offline signal the engine reads.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use offcache_core::CacheEngine;

use crate::tools::json_result;

/// Parameters for the cache_connectivity tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheConnectivityParams {
    /// New connectivity state. Omit to only report the current one.
    pub online: Option<bool>,
}

/// Output from the cache_connectivity tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheConnectivityOutput {
    pub online: bool,
    pub previous: bool,
}

/// Implementation of the cache_connectivity tool.
pub async fn connectivity_impl(
    engine: &CacheEngine, params: CacheConnectivityParams,
) -> Result<CallToolResult, McpError> {
    let connectivity = engine.connectivity();
    let previous = match params.online {
        Some(online) => {
            let previous = connectivity.set_online(online);
            if previous != online {
                tracing::info!(online, "connectivity overridden by host");
            }
            previous
        }
        None => connectivity.is_online(),
    };

    json_result(&CacheConnectivityOutput { online: connectivity.is_online(), previous })
}
