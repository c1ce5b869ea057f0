//! Entry store: typed cache entries over a blob store, with per-key locking.
//!
//! Reads take a shared lock on the key's stripe; writes and deletes take it
//! exclusively. Stripes are picked from the key, so unrelated keys rarely
//! contend. No network I/O ever happens while a stripe is held.

use std::sync::Arc;

use tokio::sync::RwLock;

use super::entry::CacheEntry;
use super::key::CacheKey;
use super::store::BlobStore;
use crate::Error;

const STRIPES: usize = 64;

/// Shared handle to the stored entries. Cloning is cheap.
#[derive(Clone)]
pub struct EntryStore {
    blobs: Arc<dyn BlobStore>,
    stripes: Arc<[RwLock<()>]>,
}

impl std::fmt::Debug for EntryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryStore")
            .field("stripes", &self.stripes.len())
            .finish_non_exhaustive()
    }
}

impl EntryStore {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        let stripes = (0..STRIPES).map(|_| RwLock::new(())).collect();
        Self { blobs, stripes }
    }

    fn stripe(&self, key: &CacheKey) -> &RwLock<()> {
        &self.stripes[key.stripe(self.stripes.len())]
    }

    pub async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, Error> {
        let _guard = self.stripe(key).read().await;
        match self.blobs.get(key.as_str()).await? {
            Some(bytes) => CacheEntry::decode(&bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Store an entry, replacing any previous entry for its key.
    ///
    /// The record is encoded before the lock is taken and written with one
    /// `put`, so a cancelled caller leaves either the old entry or the new one.
    pub async fn put(&self, entry: &CacheEntry) -> Result<(), Error> {
        let bytes = entry.encode()?;
        let _guard = self.stripe(&entry.key).write().await;
        self.blobs.put(entry.key.as_str(), bytes).await
    }

    pub async fn remove(&self, key: &CacheKey) -> Result<bool, Error> {
        let _guard = self.stripe(key).write().await;
        self.blobs.delete(key.as_str()).await
    }

    /// Delete the entry for `key` if `predicate` approves it.
    ///
    /// The entry is re-read under the exclusive lock, so the decision is made
    /// on what is actually stored. A record that fails to decode is passed as
    /// `None`.
    pub async fn remove_if<F>(&self, key: &CacheKey, predicate: F) -> Result<bool, Error>
    where
        F: FnOnce(Option<&CacheEntry>) -> bool + Send,
    {
        let _guard = self.stripe(key).write().await;
        let Some(bytes) = self.blobs.get(key.as_str()).await? else {
            return Ok(false);
        };

        let remove = match CacheEntry::decode(&bytes) {
            Ok(entry) => predicate(Some(&entry)),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "undecodable cache entry");
                predicate(None)
            }
        };

        if remove { self.blobs.delete(key.as_str()).await } else { Ok(false) }
    }

    /// Keys of all stored entries. Foreign keys in the blob store are skipped.
    pub async fn keys(&self) -> Result<Vec<CacheKey>, Error> {
        let keys = self.blobs.keys().await?;
        Ok(keys
            .iter()
            .filter_map(|raw| CacheKey::parse(raw).ok())
            .collect())
    }

    /// Remove every entry, holding every stripe while doing so.
    pub async fn clear(&self) -> Result<u64, Error> {
        let mut guards = Vec::with_capacity(self.stripes.len());
        for stripe in self.stripes.iter() {
            guards.push(stripe.write().await);
        }
        self.blobs.clear().await
    }
}
