//! Index lifecycle: existence check, reuse/rebuild choice, retry.
//!
//! ```text
//! Unknown --startup--> CheckingExistence --exists--> AwaitingUserChoice
//!                              |                      |use        |rebuild
//!                              |missing               v           v
//!                              +-----------------> Rebuilding --> Ready
//! CheckingExistence / Rebuilding --error--> Failed --retry--> (same step)
//! ```
//!
//! Readiness leaves this controller only through the view (`reveal_search`)
//! and the readiness gate.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use webindex_client::RemoteIndexService;
use webindex_types::{FailedStage, IndexState};

use crate::busy::BusyFlag;
use crate::error::LifecycleError;
use crate::readiness::{self, ReadyPublisher, ReadySignal};
use crate::view::LifecycleView;

pub const STATUS_CHECKING: &str = "Checking for a saved index...";
pub const STATUS_FOUND: &str = "Found a saved index.";
pub const STATUS_BUILDING: &str = "No saved index. Building it now...";
pub const STATUS_REBUILDING: &str = "Rebuilding the index...";
pub const STATUS_DONE: &str = "Done rebuilding the index";
pub const STATUS_USING_EXISTING: &str = "Using the saved index.";
pub const STATUS_CHECK_FAILED: &str = "Could not check for a saved index, retry?";
pub const STATUS_BUILD_FAILED: &str = "Could not build index, retry?";

const CANCELLED_MESSAGE: &str = "cancelled before the server answered";

/// Owns the index state and drives the startup workflow.
pub struct IndexLifecycleController {
    service: Arc<dyn RemoteIndexService>,
    view: Arc<dyn LifecycleView>,
    state: Mutex<IndexState>,
    busy: BusyFlag,
    ready: ReadyPublisher,
}

impl IndexLifecycleController {
    pub fn new(service: Arc<dyn RemoteIndexService>, view: Arc<dyn LifecycleView>) -> Self {
        let (ready, _) = readiness::channel();
        Self {
            service,
            view,
            state: Mutex::new(IndexState::Unknown),
            busy: BusyFlag::new(),
            ready,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> IndexState {
        self.state.lock().expect("lifecycle state mutex poisoned").clone()
    }

    /// Handle for components gated on readiness.
    pub fn ready_signal(&self) -> ReadySignal {
        self.ready.subscribe()
    }

    /// Whether a lifecycle call is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Check for a saved index. Rebuilds immediately if there is none.
    pub async fn on_startup(&self) -> Result<IndexState, LifecycleError> {
        let _guard = self.busy.try_acquire().ok_or(LifecycleError::Busy)?;
        self.ensure("start up", |s| matches!(s, IndexState::Unknown))?;

        self.check_existence().await;
        Ok(self.state())
    }

    /// Reuse the saved index. No remote call.
    pub async fn on_use_existing(&self) -> Result<IndexState, LifecycleError> {
        let _guard = self.busy.try_acquire().ok_or(LifecycleError::Busy)?;
        self.ensure("use the existing index", |s| {
            matches!(s, IndexState::AwaitingUserChoice)
        })?;

        info!("Using saved index");
        self.view.hide_choice();
        self.mark_ready(STATUS_USING_EXISTING);
        Ok(self.state())
    }

    /// Discard the saved index and build a new one.
    pub async fn on_request_rebuild(&self) -> Result<IndexState, LifecycleError> {
        let _guard = self.busy.try_acquire().ok_or(LifecycleError::Busy)?;
        self.ensure("rebuild the index", |s| {
            matches!(s, IndexState::AwaitingUserChoice)
        })?;

        self.view.show_building();
        self.view.show_status(STATUS_REBUILDING);
        self.build().await;
        Ok(self.state())
    }

    /// Repeat the step that failed.
    pub async fn on_retry(&self) -> Result<IndexState, LifecycleError> {
        let _guard = self.busy.try_acquire().ok_or(LifecycleError::Busy)?;
        let current = self.ensure("retry", |s| matches!(s, IndexState::Failed { .. }))?;

        self.view.hide_retry();
        match current {
            IndexState::Failed {
                stage: FailedStage::CheckingExistence,
                ..
            } => {
                info!("Retrying existence check");
                self.check_existence().await;
            }
            _ => {
                info!("Retrying index build");
                self.view.show_building();
                self.view.show_status(STATUS_REBUILDING);
                self.build().await;
            }
        }
        Ok(self.state())
    }

    /// Return the current state if `allowed`, otherwise reject `action`.
    fn ensure(
        &self,
        action: &'static str,
        allowed: impl Fn(&IndexState) -> bool,
    ) -> Result<IndexState, LifecycleError> {
        let current = self.state();
        if allowed(&current) {
            Ok(current)
        } else {
            debug!(action, state = %current, "Rejected lifecycle action");
            Err(LifecycleError::InvalidTransition {
                action,
                state: current.name().to_string(),
            })
        }
    }

    fn set_state(&self, next: IndexState) {
        let mut state = self.state.lock().expect("lifecycle state mutex poisoned");
        debug!(from = state.name(), to = next.name(), "Index state transition");
        *state = next;
    }

    async fn check_existence(&self) {
        self.set_state(IndexState::CheckingExistence);
        let _cancel = CancelGuard::new(self, FailedStage::CheckingExistence);
        self.view.show_status(STATUS_CHECKING);

        match self.service.index_exists().await {
            Ok(true) => {
                info!("Found a saved index");
                self.set_state(IndexState::AwaitingUserChoice);
                self.view.show_status(STATUS_FOUND);
                self.view.show_choice();
            }
            Ok(false) => {
                info!("No saved index, building");
                self.view.show_status(STATUS_BUILDING);
                self.build().await;
            }
            Err(e) => self.fail(FailedStage::CheckingExistence, e.to_string()),
        }
    }

    async fn build(&self) {
        self.set_state(IndexState::Rebuilding);
        let _cancel = CancelGuard::new(self, FailedStage::Rebuilding);

        match self.service.build_index().await {
            Ok(()) => {
                info!("Index build completed");
                self.mark_ready(STATUS_DONE);
            }
            Err(e) => self.fail(FailedStage::Rebuilding, e.to_string()),
        }
    }

    fn mark_ready(&self, status: &str) {
        self.set_state(IndexState::Ready);
        self.view.show_status(status);
        self.view.reveal_search();
        self.ready.open();
    }

    fn fail(&self, stage: FailedStage, message: String) {
        warn!(?stage, error = %message, "Index operation failed");
        let status = match stage {
            FailedStage::CheckingExistence => STATUS_CHECK_FAILED,
            FailedStage::Rebuilding => STATUS_BUILD_FAILED,
        };
        self.set_state(IndexState::Failed { stage, message });
        self.view.show_status(status);
        self.view.show_retry(stage);
    }
}

/// Fails the step if its handler future is dropped while the call is
/// outstanding, so the controller can still be retried.
struct CancelGuard<'a> {
    controller: &'a IndexLifecycleController,
    stage: FailedStage,
}

impl<'a> CancelGuard<'a> {
    fn new(controller: &'a IndexLifecycleController, stage: FailedStage) -> Self {
        Self { controller, stage }
    }
}

impl Drop for CancelGuard<'_> {
    fn drop(&mut self) {
        let in_flight = match self.stage {
            FailedStage::CheckingExistence => IndexState::CheckingExistence,
            FailedStage::Rebuilding => IndexState::Rebuilding,
        };
        if self.controller.state() == in_flight {
            self.controller
                .fail(self.stage, CANCELLED_MESSAGE.to_string());
        }
    }
}
