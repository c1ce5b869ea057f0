//! Background connectivity probe.
//!
//! Sends a `HEAD` to a known URL on a fixed interval and writes the result
//! into the shared [`Connectivity`] signal. Any HTTP answer counts as online;
//! only transport failures count as offline.

use std::time::Duration;

use reqwest::{Client, Url};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use offcache_core::{Connectivity, Error};

use crate::fetch::{FetchConfig, build_client};

#[derive(Debug, Clone)]
pub struct ConnectivityProbe {
    http: Client,
    url: Url,
    connectivity: Connectivity,
}

impl ConnectivityProbe {
    pub fn new(url: Url, connectivity: Connectivity, config: &FetchConfig) -> Result<Self, Error> {
        let http = build_client(config)?;
        Ok(Self { http, url, connectivity })
    }

    /// Probe once and update the signal. Returns the observed state.
    pub async fn check(&self) -> bool {
        let online = match self.http.head(self.url.clone()).send().await {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!(url = %self.url, error = %err, "connectivity probe failed");
                false
            }
        };

        let was_online = self.connectivity.set_online(online);
        if was_online != online {
            tracing::info!(url = %self.url, online, "connectivity changed");
        }
        online
    }
}

/// Handle to a running probe task.
#[derive(Debug)]
pub struct ProbeHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ProbeHandle {
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(err) = self.task.await {
            tracing::warn!(error = %err, "probe task ended abnormally");
        }
    }
}

/// Probe every `interval`. The first probe runs immediately.
pub fn spawn_probe(probe: ConnectivityProbe, interval: Duration) -> ProbeHandle {
    let (shutdown, mut stop) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    probe.check().await;
                }
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
            }
        }
    });

    ProbeHandle { shutdown, task }
}
