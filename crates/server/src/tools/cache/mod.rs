//! Cache-related MCP tools.
//!
//! This module provides tools for inspecting and administering the cache.

pub mod connectivity;
pub mod get;
pub mod patterns;
pub mod policy;
pub mod purge;

pub use connectivity::{CacheConnectivityParams, connectivity_impl};
pub use get::{CacheGetParams, get_impl};
pub use patterns::{CachePatternsParams, patterns_impl};
pub use policy::{CachePolicyParams, policy_impl};
pub use purge::{CachePurgeParams, purge_impl};
