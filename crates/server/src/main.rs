//! offcache-mcp server entry point.
//!
//! Boots the cache engine, its background sweeper and optional connectivity
//! probe, then serves MCP on stdio.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

use offcache_client::{ConnectivityProbe, FetchConfig, HttpFetcher, spawn_probe};
use offcache_core::{AppConfig, CacheDb, CacheEngine, Connectivity, spawn_sweeper};

mod handler;
mod tools;

#[cfg(test)]
mod test_support;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("loading configuration")?;
    let db = CacheDb::open(&config.db_path).await?;
    let registry = Arc::new(config.registry()?);
    let connectivity = Connectivity::new(config.start_online);

    let fetch_config = FetchConfig::from(&config);
    let fetcher = HttpFetcher::new(fetch_config.clone())?;

    let engine = CacheEngine::new(registry, Arc::new(db), Arc::new(fetcher), connectivity.clone())
        .with_expired_offline(config.expired_offline_policy());
    let engine = Arc::new(engine);

    let sweeper = spawn_sweeper(engine.sweeper(), config.sweep_interval());

    let probe = match config.probe_url.as_deref() {
        Some(raw) => {
            let url = url::Url::parse(raw).with_context(|| format!("parsing probe_url {raw:?}"))?;
            let probe = ConnectivityProbe::new(url, connectivity, &fetch_config)?;
            Some(spawn_probe(probe, config.probe_interval()))
        }
        None => None,
    };

    tracing::info!(
        db_path = %config.db_path.display(),
        online = config.start_online,
        probe = probe.is_some(),
        "Starting offcache-mcp server on stdio transport"
    );

    let handler = handler::OffcacheServer::new(Arc::clone(&engine));
    let server = serve_server(handler, stdio()).await?;
    server.waiting().await?;

    if let Some(probe) = probe {
        probe.shutdown().await;
    }
    sweeper.shutdown().await;

    Ok(())
}
