//! Controllers for the webindex console.
//!
//! Three independent controllers, each owning its own state:
//! - `IndexLifecycleController`: existence check, reuse/rebuild choice, retry
//! - `SearchController`: query submission and result rendering, gated on
//!   index readiness
//! - `ChartController`: memory samples chart with hover and click
//!
//! Remote collaborators are injected as `webindex_client` traits and the UI
//! as the traits in [`view`], so everything runs without a live UI.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use webindex_client::MockIndexService;
//! use webindex_controller::{IndexLifecycleController, RecordingView, SearchController};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let service = Arc::new(MockIndexService::new());
//! let view = Arc::new(RecordingView::new());
//! let lifecycle = IndexLifecycleController::new(service.clone(), view.clone());
//! let search = SearchController::new(service, view, lifecycle.ready_signal(), 10);
//!
//! lifecycle.on_startup().await.unwrap();
//! search.on_submit("reuters").await.unwrap();
//! # }
//! ```

pub mod busy;
pub mod chart;
pub mod error;
pub mod lifecycle;
pub mod plot;
pub mod readiness;
pub mod recording;
pub mod search;
pub mod view;

pub use busy::{BusyFlag, BusyGuard};
pub use chart::{ChartController, ChartGeometry, ClickOutcome, HoverOutcome, HoverState};
pub use error::{ChartError, LifecycleError, SearchError};
pub use lifecycle::IndexLifecycleController;
pub use plot::{CanvasPos, Plot, RSS_SERIES_LABEL};
pub use readiness::{ReadyPublisher, ReadySignal};
pub use recording::{RecordingView, ViewEvent};
pub use search::{SearchController, SearchOutcome};
pub use view::{ChartView, LifecycleView, Pointer, ResultsView, Tooltip};
