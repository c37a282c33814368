//! # webindex-types
//!
//! Shared domain types for the webindex console.
//!
//! This crate defines the data structures passed between the remote client,
//! the controllers and the front ends:
//! - `IndexState`: lifecycle of the server-side index as seen by the client
//! - `SearchResultItem`: display-ready search result
//! - `MemorySample` / `ChartPoint`: memory usage series
//! - `Settings`: layered configuration
//!
//! ## Usage
//!
//! ```rust
//! use webindex_types::SearchResultItem;
//!
//! let item = SearchResultItem::from_raw("example.com/page1234567890", 10);
//! assert_eq!(item.href, "http://example.com/page");
//! ```

pub mod config;
pub mod error;
pub mod result;
pub mod sample;
pub mod state;

pub use config::Settings;
pub use error::WebIndexError;
pub use result::{SearchResultItem, DEFAULT_SUFFIX_LEN, HREF_SCHEME};
pub use sample::{parse_samples, ChartPoint, MemorySample};
pub use state::{FailedStage, IndexState};
