//! Error types for the webindex client.

use thiserror::Error;

/// Errors that can occur when calling the remote services.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },

    /// The request did not complete in time
    #[error("Request to {0} timed out")]
    Timeout(String),

    /// The response did not match the endpoint contract
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Invalid endpoint URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Service could not be reached or refused the call
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl ClientError {
    /// True for failures that stem from the response shape rather than the call.
    pub fn is_malformed(&self) -> bool {
        matches!(self, ClientError::Decode(_))
    }
}
