//! Configuration validation rules.
//!
//! Applied to `AppConfig` after it has been loaded from environment, files,
//! or defaults.

use crate::config::AppConfig;
use crate::policy::classify;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `sweep_interval_secs` or `probe_interval_secs` is 0
    /// - a whitelist or blacklist pattern does not compile
    /// - `probe_url` is set but empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bytes == 0 {
            return Err(invalid("max_bytes", "must be greater than 0"));
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(invalid("max_bytes", "must not exceed 50MB"));
        }

        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        if self.sweep_interval_secs == 0 {
            return Err(invalid("sweep_interval_secs", "must be greater than 0"));
        }
        if self.probe_interval_secs == 0 {
            return Err(invalid("probe_interval_secs", "must be greater than 0"));
        }

        if self.probe_url.as_deref().is_some_and(|u| u.trim().is_empty()) {
            return Err(invalid("probe_url", "must not be empty when set"));
        }

        for (field, patterns) in [("whitelist", &self.whitelist), ("blacklist", &self.blacklist)] {
            for pattern in patterns {
                if let Err(e) = regex::Regex::new(pattern) {
                    return Err(invalid(field, format!("invalid pattern {pattern:?}: {e}")));
                }
            }
        }

        for (classifier, stale_secs) in &self.staleness {
            let expire_secs = self
                .expiration
                .get(classifier)
                .copied()
                .or(self.default_expiration_secs);
            if let Some(expire_secs) = expire_secs
                && *stale_secs > expire_secs
            {
                tracing::warn!(
                    classifier = %classify(Some(classifier)),
                    staleness_secs = stale_secs,
                    expiration_secs = expire_secs,
                    "staleness window exceeds expiration window; entries will never be served as stale"
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_max_bytes_zero() {
        let config = AppConfig { max_bytes: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_bytes"));
    }

    #[test]
    fn test_validate_max_bytes_exceeds_limit() {
        let config = AppConfig { max_bytes: 51 * 1024 * 1024, ..Default::default() }; // 51MB
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_bytes"));
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));

        let config = AppConfig { timeout_ms: 301_000, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_zero_intervals() {
        let config = AppConfig { sweep_interval_secs: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "sweep_interval_secs"));

        let config = AppConfig { probe_interval_secs: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "probe_interval_secs"));
    }

    #[test]
    fn test_validate_empty_probe_url() {
        let config = AppConfig { probe_url: Some("  ".into()), ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "probe_url"));
    }

    #[test]
    fn test_validate_bad_patterns() {
        let config = AppConfig { whitelist: vec!["(".into()], ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "whitelist"));

        let config = AppConfig { blacklist: vec![r"ok\.org".into(), "[".into()], ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "blacklist"));
    }

    #[test]
    fn test_validate_staleness_above_expiration_is_allowed() {
        let config = AppConfig {
            staleness: BTreeMap::from([("text/html".to_string(), 7200)]),
            expiration: BTreeMap::from([("text/html".to_string(), 3600)]),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_max_values() {
        let config = AppConfig { max_bytes: 50 * 1024 * 1024, timeout_ms: 300_000, ..Default::default() }; // exactly 50MB
        assert!(config.validate().is_ok());
    }
}
