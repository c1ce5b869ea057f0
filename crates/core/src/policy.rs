//! Staleness and expiration windows per content type.
//!
//! Windows are looked up by classifier, the MIME essence of a response's
//! `Content-Type` (see [`classify`]). A classifier with no explicit window
//! falls back to the store's default, which is [`Window::Never`] unless the
//! configuration says otherwise.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How long an entry may age before crossing a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Window {
    /// The boundary is never crossed.
    #[default]
    Never,
    /// The boundary is crossed once the age strictly exceeds the duration.
    After(Duration),
}

impl Window {
    pub fn from_secs(secs: Option<u64>) -> Self {
        secs.map_or(Window::Never, |s| Window::After(Duration::from_secs(s)))
    }

    pub fn as_secs(&self) -> Option<u64> {
        match self {
            Window::Never => None,
            Window::After(d) => Some(d.as_secs()),
        }
    }

    /// True when `age` lies strictly beyond this window.
    pub fn exceeded_by(&self, age: Duration) -> bool {
        match self {
            Window::Never => false,
            Window::After(limit) => age > *limit,
        }
    }
}

impl From<Duration> for Window {
    fn from(duration: Duration) -> Self {
        Window::After(duration)
    }
}

/// Freshness of a cached entry at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    NotCached,
    Fresh,
    Stale,
    Expired,
}

/// Age of something stored at `stored_at`, clamped at zero.
pub fn age(stored_at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (now - stored_at).to_std().unwrap_or(Duration::ZERO)
}

/// Reduce a `Content-Type` header value to its lowercase MIME essence.
///
/// `"Text/HTML; charset=utf-8"` becomes `"text/html"`; a missing header
/// becomes the empty classifier.
pub fn classify(content_type: Option<&str>) -> String {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|essence| essence.trim().to_ascii_lowercase())
        .unwrap_or_default()
}

/// Mutable classifier → window mappings.
#[derive(Debug, Default)]
pub struct PolicyStore {
    staleness: RwLock<HashMap<String, Window>>,
    expiration: RwLock<HashMap<String, Window>>,
    default_staleness: Window,
    default_expiration: Window,
}

impl PolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose unmapped classifiers resolve to the given windows.
    pub fn with_defaults(default_staleness: Window, default_expiration: Window) -> Self {
        Self { default_staleness, default_expiration, ..Self::default() }
    }

    pub fn set_staleness(&self, classifier: &str, window: impl Into<Window>) {
        let mut map = self.staleness.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(classify(Some(classifier)), window.into());
    }

    pub fn set_expiration(&self, classifier: &str, window: impl Into<Window>) {
        let mut map = self.expiration.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(classify(Some(classifier)), window.into());
    }

    pub fn staleness(&self, classifier: &str) -> Window {
        let map = self.staleness.read().unwrap_or_else(PoisonError::into_inner);
        map.get(classifier).copied().unwrap_or(self.default_staleness)
    }

    pub fn expiration(&self, classifier: &str) -> Window {
        let map = self.expiration.read().unwrap_or_else(PoisonError::into_inner);
        map.get(classifier).copied().unwrap_or(self.default_expiration)
    }

    /// State of an entry of `content_type` stored at `stored_at`, seen at `now`.
    ///
    /// Freshness wins when a misconfigured classifier has a staleness window
    /// longer than its expiration window.
    pub fn state_of(&self, content_type: Option<&str>, stored_at: DateTime<Utc>, now: DateTime<Utc>) -> EntryState {
        let classifier = classify(content_type);
        let age = age(stored_at, now);

        if !self.staleness(&classifier).exceeded_by(age) {
            EntryState::Fresh
        } else if self.expiration(&classifier).exceeded_by(age) {
            EntryState::Expired
        } else {
            EntryState::Stale
        }
    }

    /// True when an entry is past its expiration window, whatever its staleness.
    pub fn is_expired(&self, content_type: Option<&str>, stored_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.expiration(&classify(content_type))
            .exceeded_by(age(stored_at, now))
    }
}
