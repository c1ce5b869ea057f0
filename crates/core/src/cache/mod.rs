//! Cache storage for fetched responses.
//!
//! - Keys are SHA-256 digests of the canonical URL
//! - Entries are bincode records stored in a pluggable [`BlobStore`]
//! - SQLite (WAL mode, migrations) and in-memory blob stores are provided
//! - [`EntryStore`] serializes access per key

pub mod blobs;
pub mod connection;
pub mod entries;
pub mod entry;
pub mod key;
pub mod memory;
pub mod migrations;
pub mod store;

pub use connection::CacheDb;
pub use entries::EntryStore;
pub use entry::CacheEntry;
pub use key::{CacheKey, derive_key};
pub use memory::MemoryBlobStore;
pub use store::BlobStore;
