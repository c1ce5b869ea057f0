//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (OFFCACHE_*)
//! 2. TOML config file (if OFFCACHE_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! A TOML file looks like:
//!
//! ```toml
//! whitelist = ['example\.org']
//! blacklist = ['static\.example\.org']
//! serve_expired_offline = true
//!
//! [staleness]
//! "text/html" = 60
//!
//! [expiration]
//! "text/html" = 3600
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::patterns::PatternMatcher;
use crate::policy::{PolicyStore, Window};
use crate::registry::{CacheRegistry, ExpiredOfflinePolicy};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (OFFCACHE_*)
/// 2. TOML config file (if OFFCACHE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite cache database.
    ///
    /// Set via OFFCACHE_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for outbound requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum response body size in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of redirects to follow.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Regex patterns a URL must match (any) to be cacheable. Empty = all URLs.
    ///
    /// Set via OFFCACHE_WHITELIST as a TOML array, e.g. `['example\.org']`.
    #[serde(default)]
    pub whitelist: Vec<String>,

    /// Regex patterns that make a URL uncacheable.
    #[serde(default)]
    pub blacklist: Vec<String>,

    /// Staleness window for content types without their own entry. Unset = never stale.
    #[serde(default)]
    pub default_staleness_secs: Option<u64>,

    /// Expiration window for content types without their own entry. Unset = never expires.
    #[serde(default)]
    pub default_expiration_secs: Option<u64>,

    /// Per content type staleness windows, in seconds.
    #[serde(default)]
    pub staleness: BTreeMap<String, u64>,

    /// Per content type expiration windows, in seconds.
    #[serde(default)]
    pub expiration: BTreeMap<String, u64>,

    /// Serve expired entries while offline instead of failing.
    #[serde(default = "default_true")]
    pub serve_expired_offline: bool,

    /// Seconds between expiration sweeps.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// URL probed to detect connectivity. Unset = connectivity only changes when the host says so.
    #[serde(default)]
    pub probe_url: Option<String>,

    /// Seconds between connectivity probes.
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,

    /// Initial connectivity state.
    #[serde(default = "default_true")]
    pub start_online: bool,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./offcache.sqlite")
}

fn default_user_agent() -> String {
    "offcache/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_redirects() -> usize {
    5
}

fn default_sweep_interval_secs() -> u64 {
    300
}

fn default_probe_interval_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
            whitelist: Vec::new(),
            blacklist: Vec::new(),
            default_staleness_secs: None,
            default_expiration_secs: None,
            staleness: BTreeMap::new(),
            expiration: BTreeMap::new(),
            serve_expired_offline: true,
            sweep_interval_secs: default_sweep_interval_secs(),
            probe_url: None,
            probe_interval_secs: default_probe_interval_secs(),
            start_online: true,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs)
    }

    pub fn expired_offline_policy(&self) -> ExpiredOfflinePolicy {
        if self.serve_expired_offline { ExpiredOfflinePolicy::ServeLastResort } else { ExpiredOfflinePolicy::Miss }
    }

    /// Build the pattern lists and policy windows described by this config.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPattern` for the first pattern that fails to compile.
    pub fn registry(&self) -> Result<CacheRegistry, Error> {
        let patterns = PatternMatcher::new();
        for pattern in &self.whitelist {
            patterns.add_whitelist(pattern)?;
        }
        for pattern in &self.blacklist {
            patterns.add_blacklist(pattern)?;
        }

        let policy = PolicyStore::with_defaults(
            Window::from_secs(self.default_staleness_secs),
            Window::from_secs(self.default_expiration_secs),
        );
        for (classifier, secs) in &self.staleness {
            policy.set_staleness(classifier, Duration::from_secs(*secs));
        }
        for (classifier, secs) in &self.expiration {
            policy.set_expiration(classifier, Duration::from_secs(*secs));
        }

        Ok(CacheRegistry::new(patterns, policy))
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `OFFCACHE_`
    /// 2. TOML file from `OFFCACHE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("OFFCACHE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("OFFCACHE_")
                .ignore(&["config_file"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
