//! Cached response record and its on-disk encoding.

use bincode::{
    config::standard as bincode_config,
    serde::{decode_from_slice, encode_to_vec},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::key::CacheKey;
use crate::Error;
use crate::fetch::FetchedResponse;

/// A stored response.
///
/// There is at most one entry per key; storing again overwrites it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub url: String,
    pub content_type: Option<String>,
    pub stored_at: DateTime<Utc>,
    pub status_code: u16,
    pub headers: Vec<(String, String)>,
    #[serde(with = "serde_bytes")]
    pub payload: Vec<u8>,
}

impl CacheEntry {
    /// Build an entry from a network response received at `stored_at`.
    pub fn from_response(key: CacheKey, url: &str, response: &FetchedResponse, stored_at: DateTime<Utc>) -> Self {
        Self {
            key,
            url: url.to_string(),
            content_type: response.content_type().map(str::to_string),
            stored_at,
            status_code: response.status,
            headers: response.headers.clone(),
            payload: response.body.to_vec(),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        Ok(encode_to_vec(self, bincode_config())?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let (entry, _) = decode_from_slice(bytes, bincode_config())?;
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::key::derive_key;
    use bytes::Bytes;

    fn response() -> FetchedResponse {
        FetchedResponse {
            status: 200,
            headers: vec![
                ("content-type".into(), "text/html; charset=utf-8".into()),
                ("x-served-by".into(), "edge-1".into()),
            ],
            body: Bytes::from_static(b"<html>hello</html>"),
        }
    }

    #[test]
    fn test_from_response_copies_metadata() {
        let url = url::Url::parse("https://example.org/").unwrap();
        let entry = CacheEntry::from_response(derive_key(&url), url.as_str(), &response(), Utc::now());
        assert_eq!(entry.content_type.as_deref(), Some("text/html; charset=utf-8"));
        assert_eq!(entry.status_code, 200);
        assert_eq!(entry.headers.len(), 2);
        assert_eq!(entry.payload, b"<html>hello</html>");
    }

    #[test]
    fn test_encoded_entry_decodes_to_same_record() {
        let url = url::Url::parse("https://example.org/").unwrap();
        let entry = CacheEntry::from_response(derive_key(&url), url.as_str(), &response(), Utc::now());
        let decoded = CacheEntry::decode(&entry.encode().unwrap()).unwrap();
        assert_eq!(decoded, entry);
    }

    #[test]
    fn test_decode_garbage() {
        let result = CacheEntry::decode(b"\xff\xff\xff");
        assert!(matches!(result, Err(Error::Codec(_))));
    }
}
