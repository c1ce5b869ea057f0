//! Explicit configuration registry shared by the engine and the sweeper.

use crate::patterns::PatternMatcher;
use crate::policy::PolicyStore;

/// What the engine does with an expired entry while offline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpiredOfflinePolicy {
    /// Serve the expired payload rather than failing.
    #[default]
    ServeLastResort,
    /// Treat the entry as absent and attempt the fetch.
    Miss,
}

/// Patterns and policy windows for one engine instance.
///
/// Engines share a registry through an `Arc`; nothing here is global, so
/// independent engines (and tests) never see each other's settings.
#[derive(Debug, Default)]
pub struct CacheRegistry {
    patterns: PatternMatcher,
    policy: PolicyStore,
}

impl CacheRegistry {
    pub fn new(patterns: PatternMatcher, policy: PolicyStore) -> Self {
        Self { patterns, policy }
    }

    pub fn patterns(&self) -> &PatternMatcher {
        &self.patterns
    }

    pub fn policy(&self) -> &PolicyStore {
        &self.policy
    }
}
