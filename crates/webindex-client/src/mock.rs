//! Mock services for testing.
//!
//! Both mocks count calls and can be scripted to fail. A gate (`Notify`)
//! holds a call in flight until the test releases it, which lets tests
//! observe intermediate states and re-entrant triggers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Notify;

use crate::error::ClientError;
use crate::service::{MetricsService, RawSamples, RemoteIndexService, SearchHits};

/// Scriptable in-memory index service.
pub struct MockIndexService {
    exists: Mutex<bool>,
    exists_failures: AtomicU32,
    build_failures: AtomicU32,
    search_results: Mutex<HashMap<String, SearchHits>>,
    search_failures: Mutex<HashMap<String, String>>,
    build_gate: Option<Arc<Notify>>,
    search_gate: Option<Arc<Notify>>,
    exists_calls: AtomicUsize,
    build_calls: AtomicUsize,
    search_calls: AtomicUsize,
}

impl MockIndexService {
    /// Create a mock with no saved index and no canned results.
    pub fn new() -> Self {
        Self {
            exists: Mutex::new(false),
            exists_failures: AtomicU32::new(0),
            build_failures: AtomicU32::new(0),
            search_results: Mutex::new(HashMap::new()),
            search_failures: Mutex::new(HashMap::new()),
            build_gate: None,
            search_gate: None,
            exists_calls: AtomicUsize::new(0),
            build_calls: AtomicUsize::new(0),
            search_calls: AtomicUsize::new(0),
        }
    }

    /// Report a saved index (or not).
    pub fn with_existing_index(self, exists: bool) -> Self {
        *self.exists.lock().expect("mock state mutex poisoned") = exists;
        self
    }

    /// Fail the next `count` existence checks.
    pub fn with_exists_failures(self, count: u32) -> Self {
        self.exists_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Fail the next `count` builds.
    pub fn with_build_failures(self, count: u32) -> Self {
        self.build_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Canned hits for a query. Unknown queries return no hits.
    pub fn with_search_results(self, query: &str, hits: &[(&str, &str)]) -> Self {
        let hits = hits
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.search_results
            .lock()
            .expect("mock state mutex poisoned")
            .insert(query.to_string(), hits);
        self
    }

    /// Make a query fail with the given message.
    pub fn with_search_failure(self, query: &str, message: &str) -> Self {
        self.search_failures
            .lock()
            .expect("mock state mutex poisoned")
            .insert(query.to_string(), message.to_string());
        self
    }

    /// Hold every build until the gate is notified.
    pub fn with_build_gate(mut self, gate: Arc<Notify>) -> Self {
        self.build_gate = Some(gate);
        self
    }

    /// Hold every search until the gate is notified.
    pub fn with_search_gate(mut self, gate: Arc<Notify>) -> Self {
        self.search_gate = Some(gate);
        self
    }

    /// Flip the saved-index flag after construction.
    pub fn set_existing_index(&self, exists: bool) {
        *self.exists.lock().expect("mock state mutex poisoned") = exists;
    }

    pub fn exists_calls(&self) -> usize {
        self.exists_calls.load(Ordering::SeqCst)
    }

    pub fn build_calls(&self) -> usize {
        self.build_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockIndexService {
    fn default() -> Self {
        Self::new()
    }
}

/// Consume one scripted failure, if any remain.
fn take_failure(counter: &AtomicU32) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[async_trait]
impl RemoteIndexService for MockIndexService {
    async fn index_exists(&self) -> Result<bool, ClientError> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        if take_failure(&self.exists_failures) {
            return Err(ClientError::Unavailable("existence check refused".to_string()));
        }
        Ok(*self.exists.lock().expect("mock state mutex poisoned"))
    }

    async fn build_index(&self) -> Result<(), ClientError> {
        self.build_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.build_gate {
            gate.notified().await;
        }
        if take_failure(&self.build_failures) {
            return Err(ClientError::Status {
                status: 500,
                url: "mock://buildIndex".to_string(),
            });
        }
        *self.exists.lock().expect("mock state mutex poisoned") = true;
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<SearchHits, ClientError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.search_gate {
            gate.notified().await;
        }
        if let Some(message) = self.search_failures.lock().expect("mock state mutex poisoned").get(query) {
            return Err(ClientError::Unavailable(message.clone()));
        }
        Ok(self
            .search_results
            .lock()
            .expect("mock state mutex poisoned")
            .get(query)
            .cloned()
            .unwrap_or_default())
    }
}

/// Scriptable in-memory metrics service.
pub struct MockMetricsService {
    samples: Mutex<RawSamples>,
    failure: Mutex<Option<String>>,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
}

impl MockMetricsService {
    /// Create a mock returning an empty sample set.
    pub fn new() -> Self {
        Self {
            samples: Mutex::new(Map::new()),
            failure: Mutex::new(None),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Return the given raw mapping, keys and values as-is.
    pub fn with_samples(self, samples: &[(&str, Value)]) -> Self {
        let map = samples
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        *self.samples.lock().expect("mock state mutex poisoned") = map;
        self
    }

    /// Fail every fetch with the given message.
    pub fn with_failure(self, message: &str) -> Self {
        *self.failure.lock().expect("mock state mutex poisoned") = Some(message.to_string());
        self
    }

    /// Change the scripted failure; `None` lets fetches succeed again.
    pub fn set_failure(&self, message: Option<&str>) {
        *self.failure.lock().expect("mock state mutex poisoned") = message.map(str::to_string);
    }

    /// Hold every fetch until the gate is notified.
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockMetricsService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricsService for MockMetricsService {
    async fn fetch_memory_samples(&self) -> Result<RawSamples, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(message) = self.failure.lock().expect("mock state mutex poisoned").clone() {
            return Err(ClientError::Unavailable(message));
        }
        Ok(self.samples.lock().expect("mock state mutex poisoned").clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_build_marks_index_existing() {
        let mock = MockIndexService::new();
        assert!(!mock.index_exists().await.unwrap());
        mock.build_index().await.unwrap();
        assert!(mock.index_exists().await.unwrap());
        assert_eq!(mock.exists_calls(), 2);
        assert_eq!(mock.build_calls(), 1);
    }

    #[tokio::test]
    async fn test_scripted_failures_are_consumed() {
        let mock = MockIndexService::new().with_exists_failures(1);
        assert!(mock.index_exists().await.is_err());
        assert!(mock.index_exists().await.is_ok());

        let mock = MockIndexService::new().with_build_failures(2);
        assert!(mock.build_index().await.is_err());
        assert!(mock.build_index().await.is_err());
        assert!(mock.build_index().await.is_ok());
    }

    #[tokio::test]
    async fn test_canned_search() {
        let mock = MockIndexService::new()
            .with_search_results("foo", &[("a", "site.com/x0123456789")])
            .with_search_failure("bad", "index offline");

        let hits = mock.search("foo").await.unwrap();
        assert_eq!(hits, vec![("a".to_string(), "site.com/x0123456789".to_string())]);
        assert!(mock.search("other").await.unwrap().is_empty());
        assert!(mock.search("bad").await.is_err());
        assert_eq!(mock.search_calls(), 3);
    }

    #[tokio::test]
    async fn test_gate_holds_build() {
        let gate = Arc::new(Notify::new());
        let mock = Arc::new(MockIndexService::new().with_build_gate(gate.clone()));

        let task = {
            let mock = mock.clone();
            tokio::spawn(async move { mock.build_index().await })
        };
        tokio::task::yield_now().await;
        assert!(!task.is_finished());

        gate.notify_one();
        task.await.unwrap().unwrap();
        assert_eq!(mock.build_calls(), 1);
    }

    #[tokio::test]
    async fn test_metrics_mock() {
        let mock = MockMetricsService::new().with_samples(&[("1", json!(75)), ("0", json!(50))]);
        let samples = mock.fetch_memory_samples().await.unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(mock.calls(), 1);

        let failing = MockMetricsService::new().with_failure("no data");
        assert!(failing.fetch_memory_samples().await.is_err());
    }
}
