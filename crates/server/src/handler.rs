//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

use offcache_core::CacheEngine;

use crate::tools::{
    CacheConnectivityParams, CacheGetParams, CachePatternsParams, CachePolicyParams, CachePurgeParams,
    WebFetchParams, cache, web_fetch,
};

/// The main MCP server handler for offcache-mcp.
#[derive(Clone)]
pub struct OffcacheServer {
    engine: Arc<CacheEngine>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl OffcacheServer {
    /// Create a new server handler around a shared engine.
    pub fn new(engine: Arc<CacheEngine>) -> Self {
        Self { engine, tool_router: Self::tool_router() }
    }

    #[tool(
        description = "Fetch a URL through the offline-tolerant cache. Serves fresh entries from the cache, refreshes stale ones when online, and falls back to cached copies when the network is unavailable."
    )]
    async fn web_fetch(&self, params: Parameters<WebFetchParams>) -> Result<CallToolResult, McpError> {
        web_fetch::fetch_impl(&self.engine, params.0).await
    }

    #[tool(
        description = "Get metadata and current freshness of a cached entry, by 64-character hex key or by URL. Never touches the network."
    )]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        cache::get_impl(&self.engine, params.0).await
    }

    #[tool(description = "Purge cache entries: all of them, those older than N seconds, and/or those past expiration.")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        cache::purge_impl(&self.engine, params.0).await
    }

    #[tool(description = "Add whitelist/blacklist regex patterns controlling which URLs are cached. Returns the active lists.")]
    async fn cache_patterns(&self, params: Parameters<CachePatternsParams>) -> Result<CallToolResult, McpError> {
        cache::patterns_impl(&self.engine, params.0).await
    }

    #[tool(description = "Set or read staleness and expiration windows (seconds) for a content type.")]
    async fn cache_policy(&self, params: Parameters<CachePolicyParams>) -> Result<CallToolResult, McpError> {
        cache::policy_impl(&self.engine, params.0).await
    }

    #[tool(description = "Set or read the online/offline state the cache uses to decide between network and cached copies.")]
    async fn cache_connectivity(
        &self, params: Parameters<CacheConnectivityParams>,
    ) -> Result<CallToolResult, McpError> {
        cache::connectivity_impl(&self.engine, params.0).await
    }
}

impl ServerHandler for OffcacheServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "offcache-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
