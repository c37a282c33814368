//! Controller error types.
//!
//! These cover misuse (wrong state, re-entrant trigger, bad input) and the
//! failures the chart surfaces. Remote failures in the index workflow are not
//! errors here: they become the `Failed` state with a visible message.

use thiserror::Error;

use webindex_client::ClientError;

/// Errors from the index lifecycle handlers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    /// The action is not valid in the current state
    #[error("Cannot {action} while the index is {state}")]
    InvalidTransition { action: &'static str, state: String },

    /// Another lifecycle call is in flight
    #[error("An index operation is already in progress")]
    Busy,
}

/// Errors from the search handler.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// The index is not ready yet
    #[error("Search is not available until the index is ready")]
    NotReady,

    /// A search is already in flight
    #[error("A search is already in progress")]
    Busy,

    /// Empty or whitespace-only query
    #[error("Empty search query")]
    EmptyQuery,
}

/// Errors from the chart handler.
#[derive(Debug, Error)]
pub enum ChartError {
    /// A fetch is already in flight
    #[error("Memory samples are already being fetched")]
    Busy,

    /// The metrics call failed
    #[error("Could not fetch memory samples: {0}")]
    Remote(#[source] ClientError),

    /// The samples did not match the contract
    #[error("Malformed memory samples: {0}")]
    Malformed(String),
}
