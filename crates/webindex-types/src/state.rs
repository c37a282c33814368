//! Index lifecycle state.
//!
//! Unknown -> CheckingExistence -> AwaitingUserChoice -> Ready
//!                             \-> Rebuilding ---------/
//!
//! `Failed` is reachable from `CheckingExistence` and `Rebuilding` and is left
//! only through a user-initiated retry.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which remote step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailedStage {
    /// The existence check failed
    CheckingExistence,
    /// The build call failed
    Rebuilding,
}

/// Lifecycle of the server-side index as observed by the client.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum IndexState {
    /// Nothing has been asked yet
    #[default]
    Unknown,
    /// Existence check in flight
    CheckingExistence,
    /// A saved index exists; waiting for reuse/rebuild
    AwaitingUserChoice,
    /// Build in flight
    Rebuilding,
    /// Index confirmed; search allowed
    Ready,
    /// A remote step failed; retry available
    Failed { stage: FailedStage, message: String },
}

impl IndexState {
    /// Search is only permitted once the index is ready.
    pub fn is_ready(&self) -> bool {
        matches!(self, IndexState::Ready)
    }

    /// True while a remote call owned by the lifecycle is outstanding.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            IndexState::CheckingExistence | IndexState::Rebuilding
        )
    }

    /// Short, stable name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            IndexState::Unknown => "unknown",
            IndexState::CheckingExistence => "checking_existence",
            IndexState::AwaitingUserChoice => "awaiting_user_choice",
            IndexState::Rebuilding => "rebuilding",
            IndexState::Ready => "ready",
            IndexState::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for IndexState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexState::Failed { stage, message } => {
                write!(f, "failed ({stage:?}): {message}")
            }
            other => f.write_str(other.name()),
        }
    }
}
