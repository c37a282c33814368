//! View seams.
//!
//! Controllers never touch a concrete UI. Each one writes to its region of
//! the screen through one of these traits; the CLI implements them on a
//! terminal and tests use `RecordingView`.

use std::time::Duration;

use serde::Serialize;

use webindex_types::{ChartPoint, FailedStage, SearchResultItem};

use crate::plot::Plot;

/// Tooltip offset from the pointer, right and down.
pub const TOOLTIP_OFFSET: f64 = 5.0;

/// Tooltip fade-in time. Removal is immediate.
pub const TOOLTIP_FADE_IN: Duration = Duration::from_millis(200);

/// Pointer position as delivered by the chart region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pointer {
    /// Position inside the canvas, in pixels
    pub canvas_x: f64,
    pub canvas_y: f64,
    /// Position on the page; the tooltip is placed relative to this
    pub page_x: f64,
    pub page_y: f64,
}

impl Pointer {
    /// A pointer on a canvas that sits at the page origin.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            canvas_x: x,
            canvas_y: y,
            page_x: x,
            page_y: y,
        }
    }

    /// Same canvas position on a canvas placed at `(left, top)` on the page.
    pub fn offset_by(self, left: f64, top: f64) -> Self {
        Self {
            page_x: self.canvas_x + left,
            page_y: self.canvas_y + top,
            ..self
        }
    }
}

/// Absolutely positioned hover overlay. At most one exists at a time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    /// Point the tooltip describes
    pub point_index: usize,
    /// e.g. "RSS/K at 1.00 = 75.00"
    pub text: String,
    pub left: f64,
    pub top: f64,
    pub fade_in: Duration,
}

impl Tooltip {
    /// Tooltip for `point` of series `label`, placed next to the pointer.
    pub fn for_point(label: &str, point_index: usize, point: ChartPoint, pointer: Pointer) -> Self {
        Self {
            point_index,
            text: format!("{label} at {:.2} = {:.2}", point.x, point.y),
            left: pointer.page_x + TOOLTIP_OFFSET,
            top: pointer.page_y + TOOLTIP_OFFSET,
            fade_in: TOOLTIP_FADE_IN,
        }
    }
}

/// Status region, reuse/rebuild choice and the search form's visibility.
pub trait LifecycleView: Send + Sync {
    /// Replace the status text.
    fn show_status(&self, message: &str);

    /// Show the "use existing" / "rebuild" choice.
    fn show_choice(&self);

    /// Hide the choice.
    fn hide_choice(&self);

    /// Replace the choice with a busy indicator while a build runs.
    fn show_building(&self);

    /// Offer a retry for the failed stage.
    fn show_retry(&self, stage: FailedStage);

    /// Withdraw the retry offer.
    fn hide_retry(&self);

    /// Reveal the search form. Called once the index is ready.
    fn reveal_search(&self);
}

/// Results area below the search form.
pub trait ResultsView: Send + Sync {
    /// Busy state while a query runs.
    fn show_searching(&self);

    /// Ordered list of result links. An empty slice renders an empty list.
    fn render_results(&self, items: &[SearchResultItem]);

    /// Visible failure, distinct from an empty list.
    fn render_search_error(&self, message: &str);

    /// Input hint (e.g. for an empty query).
    fn show_results_notice(&self, message: &str);
}

/// Chart region.
pub trait ChartView: Send + Sync {
    fn render_chart(&self, plot: &Plot);

    fn render_chart_error(&self, message: &str);

    /// Pointer position in data space, already formatted.
    fn update_readout(&self, x: &str, y: &str);

    fn show_tooltip(&self, tooltip: &Tooltip);

    fn remove_tooltip(&self);

    fn highlight(&self, series_label: &str, point_index: usize, point: ChartPoint);
}
