//! Core of offcache: an offline-tolerant HTTP response cache.
//!
//! This crate provides:
//! - The decision engine that picks between cache and network per request
//! - Whitelist/blacklist URL gating and per content type freshness policy
//! - Entry storage over SQLite or memory, and the expiration sweeper
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod canonical;
pub mod clock;
pub mod config;
pub mod connectivity;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod patterns;
pub mod policy;
pub mod registry;
pub mod sweeper;

pub use cache::{BlobStore, CacheDb, CacheEntry, CacheKey, MemoryBlobStore};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use connectivity::Connectivity;
pub use engine::{CacheEngine, CachedResponse, ResponseSource};
pub use error::Error;
pub use fetch::{CacheRequest, FetchedResponse, Fetcher};
pub use policy::{EntryState, Window};
pub use registry::{CacheRegistry, ExpiredOfflinePolicy};
pub use sweeper::{SweepReport, Sweeper, SweeperHandle, spawn_sweeper};
