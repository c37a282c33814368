//! Memory usage chart with hover tooltip and click highlight.
//!
//! Hover keeps a single tooltip and only rebuilds it when the nearest point
//! changes, so pointer jitter over one point does not flicker.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{debug, info, warn};

use webindex_client::MetricsService;
use webindex_types::{parse_samples, ChartPoint, Settings};

use crate::busy::BusyFlag;
use crate::error::ChartError;
use crate::plot::{CanvasPos, Plot, RSS_SERIES_LABEL};
use crate::view::{ChartView, Pointer, Tooltip};

/// Which point the pointer was last over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HoverState {
    pub previous_point: Option<usize>,
}

/// Result of a hover event.
#[derive(Debug, Clone, PartialEq)]
pub enum HoverOutcome {
    /// No chart is shown
    Ignored,
    /// Still over the same point (or still over nothing)
    Unchanged,
    /// A new tooltip replaced whatever was there
    Tooltip(Tooltip),
    /// Left all points; tooltip removed
    Cleared,
}

/// Result of a click event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// No chart is shown
    Ignored,
    /// The click did not land on a point
    Missed,
    /// The point is now highlighted
    Highlighted(usize),
    /// The point was highlighted already; nothing changed
    AlreadyHighlighted(usize),
}

/// Chart geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartGeometry {
    pub width: f64,
    pub height: f64,
    pub hit_radius: f64,
}

impl Default for ChartGeometry {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            hit_radius: 10.0,
        }
    }
}

impl From<&Settings> for ChartGeometry {
    fn from(settings: &Settings) -> Self {
        Self {
            width: settings.chart_width,
            height: settings.chart_height,
            hit_radius: settings.hit_radius,
        }
    }
}

#[derive(Debug, Default)]
struct ChartInner {
    plot: Option<Plot>,
    hover: HoverState,
    tooltip: Option<Tooltip>,
}

/// Fetches memory samples and handles pointer interaction on the plot.
pub struct ChartController {
    metrics: Arc<dyn MetricsService>,
    view: Arc<dyn ChartView>,
    geometry: ChartGeometry,
    busy: BusyFlag,
    inner: Mutex<ChartInner>,
}

impl ChartController {
    pub fn new(
        metrics: Arc<dyn MetricsService>,
        view: Arc<dyn ChartView>,
        geometry: ChartGeometry,
    ) -> Self {
        Self {
            metrics,
            view,
            geometry,
            busy: BusyFlag::new(),
            inner: Mutex::new(ChartInner::default()),
        }
    }

    /// Fetch samples and render the chart. Returns the number of points.
    ///
    /// Showing again replaces the plot and clears hover and highlight state.
    pub async fn on_show_requested(&self) -> Result<usize, ChartError> {
        let _guard = self.busy.try_acquire().ok_or(ChartError::Busy)?;

        let raw = match self.metrics.fetch_memory_samples().await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Memory samples fetch failed");
                self.discard_plot();
                self.view
                    .render_chart_error(&format!("Could not load memory samples: {e}"));
                let err = if e.is_malformed() {
                    ChartError::Malformed(e.to_string())
                } else {
                    ChartError::Remote(e)
                };
                return Err(err);
            }
        };

        let samples = match parse_samples(&raw) {
            Ok(samples) => samples,
            Err(e) => {
                warn!(error = %e, "Memory samples malformed");
                self.discard_plot();
                self.view
                    .render_chart_error(&format!("Could not load memory samples: {e}"));
                return Err(ChartError::Malformed(e.to_string()));
            }
        };

        let points: Vec<ChartPoint> = samples.into_iter().map(ChartPoint::from).collect();
        let count = points.len();
        let plot = Plot::new(
            RSS_SERIES_LABEL,
            points,
            self.geometry.width,
            self.geometry.height,
        );

        let mut inner = self.inner.lock().expect("chart mutex poisoned");
        if inner.tooltip.take().is_some() {
            self.view.remove_tooltip();
        }
        inner.hover = HoverState::default();
        self.view.render_chart(&plot);
        inner.plot = Some(plot);

        info!(points = count, "Memory chart rendered");
        Ok(count)
    }

    /// Pointer moved over the chart region.
    pub fn on_hover(&self, pointer: Pointer) -> HoverOutcome {
        let mut inner = self.inner.lock().expect("chart mutex poisoned");
        let ChartInner {
            plot,
            hover,
            tooltip,
        } = &mut *inner;
        let Some(plot) = plot.as_ref() else {
            return HoverOutcome::Ignored;
        };

        let pos = CanvasPos {
            x: pointer.canvas_x,
            y: pointer.canvas_y,
        };
        let at = plot.to_data(pos);
        self.view
            .update_readout(&format!("{:.2}", at.x), &format!("{:.2}", at.y));

        match plot.nearest_within(pos, self.geometry.hit_radius) {
            Some(index) if hover.previous_point == Some(index) => HoverOutcome::Unchanged,
            Some(index) => {
                hover.previous_point = Some(index);
                if tooltip.take().is_some() {
                    self.view.remove_tooltip();
                }
                let Some(point) = plot.point(index) else {
                    return HoverOutcome::Unchanged;
                };
                let created = Tooltip::for_point(plot.label(), index, point, pointer);
                debug!(index, text = %created.text, "Tooltip shown");
                self.view.show_tooltip(&created);
                *tooltip = Some(created.clone());
                HoverOutcome::Tooltip(created)
            }
            None => {
                hover.previous_point = None;
                if tooltip.take().is_some() {
                    self.view.remove_tooltip();
                    HoverOutcome::Cleared
                } else {
                    HoverOutcome::Unchanged
                }
            }
        }
    }

    /// Pointer clicked on the chart region.
    pub fn on_click(&self, pointer: Pointer) -> ClickOutcome {
        let mut inner = self.inner.lock().expect("chart mutex poisoned");
        let Some(plot) = inner.plot.as_mut() else {
            return ClickOutcome::Ignored;
        };

        let pos = CanvasPos {
            x: pointer.canvas_x,
            y: pointer.canvas_y,
        };
        let Some(index) = plot.nearest_within(pos, self.geometry.hit_radius) else {
            return ClickOutcome::Missed;
        };

        if !plot.highlight(index) {
            return ClickOutcome::AlreadyHighlighted(index);
        }
        if let Some(point) = plot.point(index) {
            self.view.highlight(plot.label(), index, point);
        }
        ClickOutcome::Highlighted(index)
    }

    /// Drop the shown plot along with its tooltip and hover state.
    fn discard_plot(&self) {
        let mut inner = self.inner.lock().expect("chart mutex poisoned");
        if inner.tooltip.take().is_some() {
            self.view.remove_tooltip();
        }
        inner.hover = HoverState::default();
        inner.plot = None;
    }

    pub fn hover_state(&self) -> HoverState {
        self.inner.lock().expect("chart mutex poisoned").hover
    }

    pub fn tooltip(&self) -> Option<Tooltip> {
        self.inner.lock().expect("chart mutex poisoned").tooltip.clone()
    }

    /// Copy of the current plot, if one is shown.
    pub fn plot(&self) -> Option<Plot> {
        self.inner.lock().expect("chart mutex poisoned").plot.clone()
    }

    pub fn geometry(&self) -> ChartGeometry {
        self.geometry
    }
}
