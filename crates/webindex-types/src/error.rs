//! Error types for the webindex console.

use thiserror::Error;

/// Unified error type for domain and configuration failures.
#[derive(Debug, Error)]
pub enum WebIndexError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A sample key was not a base-10 integer
    #[error("Invalid sample key {key:?}: expected a base-10 integer")]
    InvalidSampleKey { key: String },

    /// Two sample keys named the same index (e.g. "1" and "01")
    #[error("Duplicate sample index {index}: keys {first:?} and {second:?}")]
    DuplicateSampleIndex {
        index: i64,
        first: String,
        second: String,
    },

    /// A sample value was not a number
    #[error("Invalid sample value for key {key:?}: expected a number")]
    InvalidSampleValue { key: String },

    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
