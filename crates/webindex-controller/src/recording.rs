//! Recording view for testing.
//!
//! Captures every view call in order so tests can assert on what the user
//! would have seen.

use std::sync::Mutex;

use webindex_types::{ChartPoint, FailedStage, SearchResultItem};

use crate::plot::Plot;
use crate::view::{ChartView, LifecycleView, ResultsView, Tooltip};

/// One captured view call.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Status(String),
    ChoiceShown,
    ChoiceHidden,
    Building,
    RetryShown(FailedStage),
    RetryHidden,
    SearchRevealed,
    Searching,
    Results(Vec<SearchResultItem>),
    SearchError(String),
    ResultsNotice(String),
    ChartRendered { label: String, points: Vec<ChartPoint> },
    ChartError(String),
    Readout { x: String, y: String },
    TooltipShown(Tooltip),
    TooltipRemoved,
    Highlighted { label: String, point_index: usize },
}

/// View that implements every region by recording calls.
#[derive(Debug, Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: ViewEvent) {
        self.events.lock().expect("recording mutex poisoned").push(event);
    }

    /// Snapshot of all events so far.
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().expect("recording mutex poisoned").clone()
    }

    /// Number of recorded events matching `pred`.
    pub fn count(&self, pred: impl Fn(&ViewEvent) -> bool) -> usize {
        self.events.lock().expect("recording mutex poisoned").iter().filter(|e| pred(e)).count()
    }

    /// Most recent status text.
    pub fn last_status(&self) -> Option<String> {
        self.events
            .lock()
            .expect("recording mutex poisoned")
            .iter()
            .rev()
            .find_map(|e| match e {
                ViewEvent::Status(s) => Some(s.clone()),
                _ => None,
            })
    }

    /// Tooltips currently on screen (shown minus removed).
    pub fn live_tooltips(&self) -> usize {
        let shown = self.count(|e| matches!(e, ViewEvent::TooltipShown(_)));
        let removed = self.count(|e| matches!(e, ViewEvent::TooltipRemoved));
        shown.saturating_sub(removed)
    }

    /// Whether the search form has been revealed.
    pub fn search_revealed(&self) -> bool {
        self.count(|e| matches!(e, ViewEvent::SearchRevealed)) > 0
    }

    /// Last rendered result list, if any.
    pub fn last_results(&self) -> Option<Vec<SearchResultItem>> {
        self.events
            .lock()
            .expect("recording mutex poisoned")
            .iter()
            .rev()
            .find_map(|e| match e {
                ViewEvent::Results(items) => Some(items.clone()),
                _ => None,
            })
    }

    pub fn clear(&self) {
        self.events.lock().expect("recording mutex poisoned").clear();
    }
}

impl LifecycleView for RecordingView {
    fn show_status(&self, message: &str) {
        self.push(ViewEvent::Status(message.to_string()));
    }

    fn show_choice(&self) {
        self.push(ViewEvent::ChoiceShown);
    }

    fn hide_choice(&self) {
        self.push(ViewEvent::ChoiceHidden);
    }

    fn show_building(&self) {
        self.push(ViewEvent::Building);
    }

    fn show_retry(&self, stage: FailedStage) {
        self.push(ViewEvent::RetryShown(stage));
    }

    fn hide_retry(&self) {
        self.push(ViewEvent::RetryHidden);
    }

    fn reveal_search(&self) {
        self.push(ViewEvent::SearchRevealed);
    }
}

impl ResultsView for RecordingView {
    fn show_searching(&self) {
        self.push(ViewEvent::Searching);
    }

    fn render_results(&self, items: &[SearchResultItem]) {
        self.push(ViewEvent::Results(items.to_vec()));
    }

    fn render_search_error(&self, message: &str) {
        self.push(ViewEvent::SearchError(message.to_string()));
    }

    fn show_results_notice(&self, message: &str) {
        self.push(ViewEvent::ResultsNotice(message.to_string()));
    }
}

impl ChartView for RecordingView {
    fn render_chart(&self, plot: &Plot) {
        self.push(ViewEvent::ChartRendered {
            label: plot.label().to_string(),
            points: plot.points().to_vec(),
        });
    }

    fn render_chart_error(&self, message: &str) {
        self.push(ViewEvent::ChartError(message.to_string()));
    }

    fn update_readout(&self, x: &str, y: &str) {
        self.push(ViewEvent::Readout {
            x: x.to_string(),
            y: y.to_string(),
        });
    }

    fn show_tooltip(&self, tooltip: &Tooltip) {
        self.push(ViewEvent::TooltipShown(tooltip.clone()));
    }

    fn remove_tooltip(&self) {
        self.push(ViewEvent::TooltipRemoved);
    }

    fn highlight(&self, series_label: &str, point_index: usize, _point: ChartPoint) {
        self.push(ViewEvent::Highlighted {
            label: series_label.to_string(),
            point_index,
        });
    }
}
