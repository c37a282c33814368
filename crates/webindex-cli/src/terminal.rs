//! Terminal rendering of the console views.
//!
//! Hiding a region has no terminal equivalent, so hide calls print nothing.

use std::io::{self, Write};
use std::sync::Mutex;

use webindex_controller::{ChartView, LifecycleView, Plot, ResultsView, Tooltip};
use webindex_types::{ChartPoint, FailedStage, SearchResultItem};

/// Writes every view update as plain text lines.
pub struct TerminalView {
    out: Mutex<Box<dyn Write + Send>>,
}

impl TerminalView {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Write one line. Output errors (closed pipe) are dropped.
    pub fn line(&self, text: &str) {
        let mut out = self.out.lock().expect("terminal output mutex poisoned");
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }
}

impl LifecycleView for TerminalView {
    fn show_status(&self, message: &str) {
        self.line(message);
    }

    fn show_choice(&self) {
        self.line("[u] use the saved index   [r] rebuild it");
    }

    fn hide_choice(&self) {}

    fn show_building(&self) {
        self.line("Building the index, this can take a while...");
    }

    fn show_retry(&self, stage: FailedStage) {
        let what = match stage {
            FailedStage::CheckingExistence => "check again",
            FailedStage::Rebuilding => "build again",
        };
        self.line(&format!("[r] {what}   [q] quit"));
    }

    fn hide_retry(&self) {}

    fn reveal_search(&self) {
        self.line("Enter a search query below ('h' for help, 'q' to quit).");
    }
}

impl ResultsView for TerminalView {
    fn show_searching(&self) {
        self.line("Searching...");
    }

    fn render_results(&self, items: &[SearchResultItem]) {
        if items.is_empty() {
            self.line("No results.");
            return;
        }
        for (n, item) in items.iter().enumerate() {
            self.line(&format!("{:>3}. {}", n + 1, item.label()));
        }
    }

    fn render_search_error(&self, message: &str) {
        self.line(&format!("error: {message}"));
    }

    fn show_results_notice(&self, message: &str) {
        self.line(message);
    }
}

impl ChartView for TerminalView {
    fn render_chart(&self, plot: &Plot) {
        self.line(&format!("{} ({} samples)", plot.label(), plot.points().len()));
        for point in plot.points() {
            let at = plot.to_canvas(*point);
            self.line(&format!(
                "  x={:<6} y={:<12.2} canvas=({:.0}, {:.0})",
                point.x, point.y, at.x, at.y
            ));
        }
    }

    fn render_chart_error(&self, message: &str) {
        self.line(&format!("error: {message}"));
    }

    fn update_readout(&self, x: &str, y: &str) {
        self.line(&format!("pointer x={x} y={y}"));
    }

    fn show_tooltip(&self, tooltip: &Tooltip) {
        self.line(&format!(
            "tooltip: {} (at {:.0}, {:.0})",
            tooltip.text, tooltip.left, tooltip.top
        ));
    }

    fn remove_tooltip(&self) {}

    fn highlight(&self, series_label: &str, point_index: usize, point: ChartPoint) {
        self.line(&format!(
            "highlighted {series_label} point {point_index} ({:.2}, {:.2})",
            point.x, point.y
        ));
    }
}
