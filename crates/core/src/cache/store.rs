//! Byte-blob storage collaborator.

use async_trait::async_trait;

use crate::Error;

/// Keyed byte-blob store underneath the entry store.
///
/// `put` must replace the whole value in one step: readers see either the
/// previous blob or the new one, never a mix.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error>;

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), Error>;

    /// Returns whether a blob was removed.
    async fn delete(&self, key: &str) -> Result<bool, Error>;

    /// All stored keys, in no particular order.
    async fn keys(&self) -> Result<Vec<String>, Error>;

    /// Remove every blob, returning how many were removed.
    async fn clear(&self) -> Result<u64, Error>;
}
