//! Remote collaborators of the console.
//!
//! Index construction, ranking and persistence all happen behind these
//! traits; the console only sees completion signals and decoded payloads.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::ClientError;

/// Search hits as `(key, suffix-decorated URL)` pairs, in document order.
pub type SearchHits = Vec<(String, String)>;

/// Memory samples exactly as received: integer-string keys to numbers.
pub type RawSamples = Map<String, Value>;

/// Index operations exposed by the search server.
#[async_trait]
pub trait RemoteIndexService: Send + Sync {
    /// Whether a previously built index is available.
    async fn index_exists(&self) -> Result<bool, ClientError>;

    /// (Re)build the index. Resolves once the build has completed.
    async fn build_index(&self) -> Result<(), ClientError>;

    /// Run a free-text query.
    async fn search(&self, query: &str) -> Result<SearchHits, ClientError>;
}

/// Memory usage samples recorded while indexing.
#[async_trait]
pub trait MetricsService: Send + Sync {
    /// Fetch the raw sample mapping.
    async fn fetch_memory_samples(&self) -> Result<RawSamples, ClientError>;
}
