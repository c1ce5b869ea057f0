//! Whitelist/blacklist URL gating.
//!
//! A URL is cacheable when it matches at least one whitelist pattern (or the
//! whitelist is empty) and matches no blacklist pattern. Patterns are searched
//! unanchored against the full canonical URL, so they must be escaped by the
//! caller (`example\.org`, not `example.org`).

use std::sync::{PoisonError, RwLock};

use regex::Regex;

use crate::Error;

/// Ordered whitelist and blacklist of compiled patterns.
#[derive(Debug, Default)]
pub struct PatternMatcher {
    whitelist: RwLock<Vec<Regex>>,
    blacklist: RwLock<Vec<Regex>>,
}

fn compile(pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern).map_err(|e| Error::InvalidPattern { pattern: pattern.to_string(), reason: e.to_string() })
}

fn any_match(list: &RwLock<Vec<Regex>>, url: &str) -> Option<bool> {
    let list = list.read().unwrap_or_else(PoisonError::into_inner);
    if list.is_empty() { None } else { Some(list.iter().any(|re| re.is_match(url))) }
}

impl PatternMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a whitelist pattern. An invalid pattern leaves the list untouched.
    pub fn add_whitelist(&self, pattern: &str) -> Result<(), Error> {
        let re = compile(pattern)?;
        self.whitelist
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(re);
        Ok(())
    }

    /// Append a blacklist pattern. An invalid pattern leaves the list untouched.
    pub fn add_blacklist(&self, pattern: &str) -> Result<(), Error> {
        let re = compile(pattern)?;
        self.blacklist
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(re);
        Ok(())
    }

    pub fn is_cacheable(&self, url: &str) -> bool {
        if any_match(&self.whitelist, url) == Some(false) {
            return false;
        }
        any_match(&self.blacklist, url) != Some(true)
    }

    /// Registered whitelist patterns, in registration order.
    pub fn whitelist(&self) -> Vec<String> {
        let list = self.whitelist.read().unwrap_or_else(PoisonError::into_inner);
        list.iter().map(|re| re.as_str().to_string()).collect()
    }

    /// Registered blacklist patterns, in registration order.
    pub fn blacklist(&self) -> Vec<String> {
        let list = self.blacklist.read().unwrap_or_else(PoisonError::into_inner);
        list.iter().map(|re| re.as_str().to_string()).collect()
    }

    pub fn clear(&self) {
        self.whitelist.write().unwrap_or_else(PoisonError::into_inner).clear();
        self.blacklist.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_lists_cache_everything() {
        let matcher = PatternMatcher::new();
        assert!(matcher.is_cacheable("https://example.org/"));
        assert!(matcher.is_cacheable("https://anything.test/x?y=1"));
    }

    #[test]
    fn test_empty_whitelist_blacklist_only() {
        let matcher = PatternMatcher::new();
        matcher.add_blacklist(r"\.mp4$").unwrap();
        assert!(matcher.is_cacheable("https://example.org/index.html"));
        assert!(!matcher.is_cacheable("https://example.org/movie.mp4"));
    }

    #[test]
    fn test_whitelist_required_when_present() {
        let matcher = PatternMatcher::new();
        matcher.add_whitelist(r"github\.org").unwrap();
        matcher.add_whitelist(r"wikipedia\.org").unwrap();
        assert!(matcher.is_cacheable("https://en.wikipedia.org/wiki/Rust"));
        assert!(matcher.is_cacheable("https://github.org/x"));
        assert!(!matcher.is_cacheable("https://example.org/"));
    }

    #[test]
    fn test_blacklist_overrides_whitelist() {
        let matcher = PatternMatcher::new();
        matcher.add_whitelist(r"example\.org").unwrap();
        matcher.add_blacklist(r"static\.example\.org").unwrap();
        assert!(!matcher.is_cacheable("https://static.example.org/x"));
        assert!(matcher.is_cacheable("https://www.example.org/x"));
    }

    #[test]
    fn test_unanchored_match() {
        let matcher = PatternMatcher::new();
        matcher.add_whitelist("example").unwrap();
        assert!(matcher.is_cacheable("https://www.example.org/path"));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let matcher = PatternMatcher::new();
        matcher.add_whitelist(r"good\.org").unwrap();

        let result = matcher.add_whitelist("(unclosed");
        assert!(matches!(result, Err(Error::InvalidPattern { ref pattern, .. }) if pattern == "(unclosed"));
        assert!(matcher.add_blacklist("[z-a]").is_err());

        assert_eq!(matcher.whitelist(), vec![r"good\.org".to_string()]);
        assert!(matcher.blacklist().is_empty());
        assert!(matcher.is_cacheable("https://good.org/"));
    }

    #[test]
    fn test_registration_order_preserved() {
        let matcher = PatternMatcher::new();
        matcher.add_blacklist("b").unwrap();
        matcher.add_blacklist("a").unwrap();
        assert_eq!(matcher.blacklist(), vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_clear() {
        let matcher = PatternMatcher::new();
        matcher.add_whitelist(r"only\.org").unwrap();
        assert!(!matcher.is_cacheable("https://other.org/"));
        matcher.clear();
        assert!(matcher.is_cacheable("https://other.org/"));
    }
}
