//! Cache key derivation.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use url::Url;

use crate::Error;

/// Opaque identifier of a cached entry: hex-encoded SHA-256 of the canonical URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Length of a key in hex characters.
    pub const LEN: usize = 64;

    /// Validate a key supplied from outside the engine.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let raw = raw.trim();
        if raw.len() != Self::LEN || !raw.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidHash);
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lock stripe for this key, in `0..stripes`.
    pub(crate) fn stripe(&self, stripes: usize) -> usize {
        let prefix = self
            .0
            .get(..4)
            .and_then(|p| u16::from_str_radix(p, 16).ok())
            .unwrap_or_default();
        usize::from(prefix) % stripes
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the cache key for a canonical URL.
pub fn derive_key(url: &Url) -> CacheKey {
    let mut hasher = Sha256::new();
    hasher.update(url.as_str().as_bytes());
    CacheKey(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::canonicalize;

    fn key(url: &str) -> CacheKey {
        derive_key(&canonicalize(url).unwrap())
    }

    #[test]
    fn test_key_stability() {
        assert_eq!(key("https://example.org/a"), key("https://example.org/a"));
    }

    #[test]
    fn test_key_normalized_url() {
        assert_eq!(key("https://EXAMPLE.org/a#frag"), key("example.org/a"));
    }

    #[test]
    fn test_key_different_urls() {
        assert_ne!(key("https://example.org/a"), key("https://example.org/b"));
        assert_ne!(key("https://example.org/a?x=1"), key("https://example.org/a?x=2"));
    }

    #[test]
    fn test_key_format() {
        let k = key("https://example.org");
        assert_eq!(k.as_str().len(), CacheKey::LEN);
        assert!(k.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_parse_roundtrips_derived_key() {
        let k = key("https://example.org");
        assert_eq!(CacheKey::parse(&k.as_str().to_uppercase()).unwrap(), k);
    }

    #[test]
    fn test_parse_rejects_bad_keys() {
        assert!(matches!(CacheKey::parse("abc"), Err(Error::InvalidHash)));
        assert!(matches!(CacheKey::parse(&"z".repeat(64)), Err(Error::InvalidHash)));
    }

    #[test]
    fn test_stripe_in_range() {
        let k = key("https://example.org");
        assert!(k.stripe(64) < 64);
        assert_eq!(k.stripe(64), k.clone().stripe(64));
    }

    #[test]
    fn test_stripe_short_key() {
        // Keys decoded from stored records skip `parse`.
        assert_eq!(CacheKey("ab".into()).stripe(64), 0);
        assert_eq!(CacheKey(String::new()).stripe(64), 0);
    }
}
