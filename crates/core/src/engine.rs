//! The caching decision engine.
//!
//! For each request the engine derives the entry state from what is stored
//! and how old it is, then combines it with the connectivity signal:
//!
//! | state    | online                          | offline                       |
//! |----------|---------------------------------|-------------------------------|
//! | absent   | fetch, store                    | fetch, store                  |
//! | fresh    | serve cached                    | serve cached                  |
//! | stale    | refetch, fall back to cached    | serve cached                  |
//! | expired  | fetch, store, no fallback       | serve cached (configurable)   |
//!
//! Requests that fail the whitelist/blacklist gate, or are not GETs, go
//! straight to the network and never touch the cache.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;

use crate::Error;
use crate::cache::{BlobStore, CacheEntry, CacheKey, EntryStore, derive_key};
use crate::canonical::canonicalize;
use crate::clock::{Clock, SystemClock};
use crate::connectivity::Connectivity;
use crate::fetch::{CacheRequest, FetchedResponse, Fetcher};
use crate::policy::{EntryState, Window};
use crate::registry::{CacheRegistry, ExpiredOfflinePolicy};
use crate::sweeper::{SweepReport, Sweeper};

/// Where a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    /// Served from the cache without a network call.
    Cache,
    /// Fetched from the network for a cacheable request.
    Network,
    /// Fetched from the network; the request is not cacheable.
    Bypass,
}

/// Response handed back to the host.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub url: String,
    /// `None` for bypassed requests.
    pub key: Option<CacheKey>,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub content_type: Option<String>,
    pub body: Bytes,
    /// When the served entry was stored; `None` if nothing was stored.
    pub stored_at: Option<DateTime<Utc>>,
    pub source: ResponseSource,
    /// State of the cache entry when the request arrived.
    pub state: EntryState,
}

impl CachedResponse {
    fn from_entry(entry: CacheEntry, state: EntryState) -> Self {
        Self {
            url: entry.url,
            key: Some(entry.key),
            status: entry.status_code,
            headers: entry.headers,
            content_type: entry.content_type,
            body: Bytes::from(entry.payload),
            stored_at: Some(entry.stored_at),
            source: ResponseSource::Cache,
            state,
        }
    }

    fn from_network(
        url: &Url, key: Option<CacheKey>, response: FetchedResponse, source: ResponseSource, state: EntryState,
        stored_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            url: url.to_string(),
            key,
            status: response.status,
            content_type: response.content_type().map(str::to_string),
            headers: response.headers,
            body: response.body,
            stored_at,
            source,
            state,
        }
    }
}

/// Decides, per request, between the cache and the network.
pub struct CacheEngine {
    registry: Arc<CacheRegistry>,
    entries: EntryStore,
    fetcher: Arc<dyn Fetcher>,
    connectivity: Connectivity,
    clock: Arc<dyn Clock>,
    expired_offline: ExpiredOfflinePolicy,
}

impl CacheEngine {
    pub fn new(
        registry: Arc<CacheRegistry>, blobs: Arc<dyn BlobStore>, fetcher: Arc<dyn Fetcher>, connectivity: Connectivity,
    ) -> Self {
        Self {
            registry,
            entries: EntryStore::new(blobs),
            fetcher,
            connectivity,
            clock: Arc::new(SystemClock),
            expired_offline: ExpiredOfflinePolicy::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_expired_offline(mut self, policy: ExpiredOfflinePolicy) -> Self {
        self.expired_offline = policy;
        self
    }

    pub fn registry(&self) -> &Arc<CacheRegistry> {
        &self.registry
    }

    pub fn entries(&self) -> &EntryStore {
        &self.entries
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn add_whitelist_pattern(&self, pattern: &str) -> Result<(), Error> {
        self.registry.patterns().add_whitelist(pattern)
    }

    pub fn add_blacklist_pattern(&self, pattern: &str) -> Result<(), Error> {
        self.registry.patterns().add_blacklist(pattern)
    }

    pub fn set_staleness_window(&self, classifier: &str, window: impl Into<Window>) {
        self.registry.policy().set_staleness(classifier, window);
    }

    pub fn set_expiration_window(&self, classifier: &str, window: impl Into<Window>) {
        self.registry.policy().set_expiration(classifier, window);
    }

    /// Sweeper operating on this engine's entries and policy.
    pub fn sweeper(&self) -> Sweeper {
        Sweeper::new(self.entries.clone(), Arc::clone(&self.registry), Arc::clone(&self.clock))
    }

    pub async fn remove_all(&self) -> Result<SweepReport, Error> {
        self.sweeper().remove_all().await
    }

    pub async fn remove_older_than(&self, date: DateTime<Utc>) -> Result<SweepReport, Error> {
        self.sweeper().remove_older_than(date).await
    }

    pub async fn remove_expired(&self) -> Result<SweepReport, Error> {
        self.sweeper().remove_expired(self.clock.now()).await
    }

    /// Stored entry for `url`, if any, without touching the network or
    /// checking freshness.
    pub async fn cached(&self, url: &str) -> Result<Option<CacheEntry>, Error> {
        let url = canonicalize(url)?;
        self.entries.get(&derive_key(&url)).await
    }

    /// Serve a request from the cache or the network.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] for URLs that cannot be canonicalized and
    /// the fetcher's error when the network fails and no cached entry may be
    /// served instead. Storage failures never fail the request.
    pub async fn lookup_or_fetch(&self, request: &CacheRequest) -> Result<CachedResponse, Error> {
        let url = canonicalize(&request.url)?;

        if !request.is_cacheable_method() || !self.registry.patterns().is_cacheable(url.as_str()) {
            tracing::debug!(url = %url, method = %request.method, "bypassing cache");
            let response = self.fetcher.fetch(&request.method, &url).await?;
            return Ok(CachedResponse::from_network(
                &url,
                None,
                response,
                ResponseSource::Bypass,
                EntryState::NotCached,
                None,
            ));
        }

        let key = derive_key(&url);
        let cached = match self.entries.get(&key).await {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "cache read failed, treating as miss");
                None
            }
        };

        let Some(entry) = cached else {
            tracing::debug!(key = %key, url = %url, "cache miss");
            return self.fetch_and_store(&url, key, EntryState::NotCached).await;
        };

        let now = self.clock.now();
        let state = self
            .registry
            .policy()
            .state_of(entry.content_type.as_deref(), entry.stored_at, now);
        let online = self.connectivity.is_online();

        match state {
            EntryState::Fresh => {
                tracing::debug!(key = %key, "serving fresh entry");
                Ok(CachedResponse::from_entry(entry, state))
            }
            EntryState::Stale if !online => {
                tracing::debug!(key = %key, "offline, serving stale entry");
                Ok(CachedResponse::from_entry(entry, state))
            }
            EntryState::Stale => match self.fetch_and_store(&url, key, state).await {
                Ok(response) => Ok(response),
                Err(err) => {
                    tracing::warn!(key = %entry.key, error = %err, "refresh failed, serving stale entry");
                    Ok(CachedResponse::from_entry(entry, state))
                }
            },
            EntryState::Expired if !online && self.expired_offline == ExpiredOfflinePolicy::ServeLastResort => {
                tracing::debug!(key = %key, "offline, serving expired entry as last resort");
                Ok(CachedResponse::from_entry(entry, state))
            }
            EntryState::Expired | EntryState::NotCached => {
                tracing::debug!(key = %key, online, "entry expired, fetching");
                self.fetch_and_store(&url, key, state).await
            }
        }
    }

    /// Fetch `url` and, for a 2xx response, store it under `key`.
    ///
    /// A failed write is logged and the response is still returned.
    async fn fetch_and_store(&self, url: &Url, key: CacheKey, state: EntryState) -> Result<CachedResponse, Error> {
        let response = self.fetcher.fetch("GET", url).await?;

        if !response.is_success() {
            tracing::debug!(key = %key, status = response.status, "not caching unsuccessful response");
            return Ok(CachedResponse::from_network(url, Some(key), response, ResponseSource::Network, state, None));
        }

        let stored_at = self.clock.now();
        let entry = CacheEntry::from_response(key.clone(), url.as_str(), &response, stored_at);
        let stored = match self.entries.put(&entry).await {
            Ok(()) => Some(stored_at),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "failed to store fetched response");
                None
            }
        };

        Ok(CachedResponse::from_network(url, Some(key), response, ResponseSource::Network, state, stored))
    }
}
