//! Cache eviction: expired sweep, age-based purge, and full purge.
//!
//! The host decides when to sweep. [`spawn_sweeper`] runs
//! [`Sweeper::remove_expired`] on a fixed interval until shut down.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::Error;
use crate::cache::{CacheEntry, EntryStore};
use crate::clock::Clock;
use crate::registry::CacheRegistry;

/// Outcome of one purge pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, schemars::JsonSchema)]
pub struct SweepReport {
    /// Entries examined.
    pub scanned: u64,
    /// Entries deleted.
    pub removed: u64,
}

#[derive(Debug, Clone)]
pub struct Sweeper {
    entries: EntryStore,
    registry: Arc<CacheRegistry>,
    clock: Arc<dyn Clock>,
}

impl Sweeper {
    pub fn new(entries: EntryStore, registry: Arc<CacheRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { entries, registry, clock }
    }

    /// Delete entries whose age at `now` exceeds their expiration window.
    pub async fn remove_expired(&self, now: DateTime<Utc>) -> Result<SweepReport, Error> {
        let policy = self.registry.policy();
        self.remove_where(|entry| match entry {
            Some(e) => policy.is_expired(e.content_type.as_deref(), e.stored_at, now),
            None => true,
        })
        .await
    }

    /// Delete entries stored before `date`, regardless of policy.
    pub async fn remove_older_than(&self, date: DateTime<Utc>) -> Result<SweepReport, Error> {
        self.remove_where(|entry| entry.is_none_or(|e| e.stored_at < date))
            .await
    }

    pub async fn remove_all(&self) -> Result<SweepReport, Error> {
        let removed = self.entries.clear().await?;
        tracing::info!(removed, "purged all cache entries");
        Ok(SweepReport { scanned: removed, removed })
    }

    /// Run one expiration pass at the clock's current time.
    pub async fn sweep(&self) -> Result<SweepReport, Error> {
        self.remove_expired(self.clock.now()).await
    }

    async fn remove_where<F>(&self, should_remove: F) -> Result<SweepReport, Error>
    where
        F: Fn(Option<&CacheEntry>) -> bool + Send + Sync,
    {
        let mut report = SweepReport::default();

        for key in self.entries.keys().await? {
            report.scanned += 1;
            match self.entries.remove_if(&key, &should_remove).await {
                Ok(true) => report.removed += 1,
                Ok(false) => {}
                Err(err) => tracing::warn!(key = %key, error = %err, "failed to evict cache entry"),
            }
        }

        tracing::debug!(scanned = report.scanned, removed = report.removed, "cache sweep finished");
        Ok(report)
    }
}

/// Handle to a running background sweeper.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stop the sweeper and wait for the current pass to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(err) = self.task.await {
            tracing::warn!(error = %err, "sweeper task ended abnormally");
        }
    }
}

/// Sweep expired entries every `interval`. The first pass runs immediately.
pub fn spawn_sweeper(sweeper: Sweeper, interval: Duration) -> SweeperHandle {
    let (shutdown, mut stop) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => match sweeper.sweep().await {
                    Ok(report) if report.removed > 0 => {
                        tracing::info!(scanned = report.scanned, removed = report.removed, "evicted expired cache entries");
                    }
                    Ok(_) => {}
                    Err(err) => tracing::warn!(error = %err, "cache sweep failed"),
                },
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
            }
        }
    });

    SweeperHandle { shutdown, task }
}
