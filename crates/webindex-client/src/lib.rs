//! Client library for the webindex CGI endpoints.
//!
//! This crate provides:
//! - `RemoteIndexService` and `MetricsService`, the async seams the
//!   controllers call through
//! - `HttpIndexClient`, the reqwest implementation of both
//! - `MockIndexService` / `MockMetricsService` for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use webindex_client::{HttpIndexClient, RemoteIndexService};
//! use webindex_types::Settings;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpIndexClient::from_settings(&Settings::default())?;
//!
//!     if !client.index_exists().await? {
//!         client.build_index().await?;
//!     }
//!     for (key, raw) in client.search("reuters").await? {
//!         println!("{key}: {raw}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod decode;
pub mod error;
pub mod http;
pub mod mock;
pub mod service;

pub use decode::{decode_samples, decode_search_hits, is_truthy};
pub use error::ClientError;
pub use http::HttpIndexClient;
pub use mock::{MockIndexService, MockMetricsService};
pub use service::{MetricsService, RawSamples, RemoteIndexService, SearchHits};
