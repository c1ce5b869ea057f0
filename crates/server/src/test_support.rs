use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rmcp::model::CallToolResult;
use url::Url;

use offcache_core::{
    CacheEngine, CacheRegistry, Connectivity, Error, FetchedResponse, Fetcher, ManualClock, MemoryBlobStore,
};

/// Fetcher that replays queued results, then fails as if unreachable.
#[derive(Default)]
pub struct QueuedFetcher {
    results: Mutex<VecDeque<Result<FetchedResponse, Error>>>,
}

impl QueuedFetcher {
    pub fn push_ok(&self, content_type: &str, body: &'static str) {
        let response = FetchedResponse {
            status: 200,
            headers: vec![("content-type".to_string(), content_type.to_string())],
            body: body.into(),
        };
        self.results.lock().unwrap().push_back(Ok(response));
    }
}

#[async_trait]
impl Fetcher for QueuedFetcher {
    async fn fetch(&self, _method: &str, _url: &Url) -> Result<FetchedResponse, Error> {
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Network("unreachable".into())))
    }
}

pub fn t(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

pub struct TestEngine {
    pub engine: Arc<CacheEngine>,
    pub fetcher: Arc<QueuedFetcher>,
    pub clock: Arc<ManualClock>,
}

pub fn engine() -> TestEngine {
    let fetcher = Arc::new(QueuedFetcher::default());
    let clock = Arc::new(ManualClock::new(t(0)));
    let engine = CacheEngine::new(
        Arc::new(CacheRegistry::default()),
        Arc::new(MemoryBlobStore::new()),
        fetcher.clone(),
        Connectivity::default(),
    )
    .with_clock(clock.clone());
    TestEngine { engine: Arc::new(engine), fetcher, clock }
}

/// Parse the JSON text content of a tool result.
pub fn output(result: &CallToolResult) -> serde_json::Value {
    let content = serde_json::to_value(&result.content[0]).unwrap();
    let text = content.get("text").and_then(|v| v.as_str()).unwrap();
    serde_json::from_str(text).unwrap()
}
