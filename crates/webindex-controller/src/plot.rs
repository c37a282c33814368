//! Plot model for the memory chart.
//!
//! A single series drawn as connected line segments with point markers on a
//! canvas whose y axis grows downward. The model owns the coordinate mapping
//! and hit testing so the controller can work without a live canvas.

use std::collections::BTreeSet;

use serde::Serialize;

use webindex_types::ChartPoint;

/// Label of the memory series.
pub const RSS_SERIES_LABEL: &str = "RSS/K";

/// A position on the canvas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasPos {
    pub x: f64,
    pub y: f64,
}

/// Drawing options for the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesStyle {
    pub lines: bool,
    pub points: bool,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self {
            lines: true,
            points: true,
        }
    }
}

/// Inclusive axis range; never zero-width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    fn spanning(values: impl Iterator<Item = f64>) -> Self {
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !min.is_finite() || !max.is_finite() {
            return Self { min: 0.0, max: 1.0 };
        }
        if min == max {
            return Self {
                min: min - 1.0,
                max: max + 1.0,
            };
        }
        Self { min, max }
    }

    fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// One rendered series with hover and click enabled.
#[derive(Debug, Clone, Serialize)]
pub struct Plot {
    label: String,
    points: Vec<ChartPoint>,
    style: SeriesStyle,
    width: f64,
    height: f64,
    x_range: AxisRange,
    y_range: AxisRange,
    highlighted: BTreeSet<usize>,
}

impl Plot {
    /// Build a plot over `points`, which must already be in x order.
    pub fn new(label: impl Into<String>, points: Vec<ChartPoint>, width: f64, height: f64) -> Self {
        let x_range = AxisRange::spanning(points.iter().map(|p| p.x));
        let y_range = AxisRange::spanning(points.iter().map(|p| p.y));
        Self {
            label: label.into(),
            points,
            style: SeriesStyle::default(),
            width,
            height,
            x_range,
            y_range,
            highlighted: BTreeSet::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Option<ChartPoint> {
        self.points.get(index).copied()
    }

    pub fn style(&self) -> SeriesStyle {
        self.style
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn x_range(&self) -> AxisRange {
        self.x_range
    }

    pub fn y_range(&self) -> AxisRange {
        self.y_range
    }

    /// Map a data point to the canvas.
    pub fn to_canvas(&self, point: ChartPoint) -> CanvasPos {
        CanvasPos {
            x: (point.x - self.x_range.min) / self.x_range.span() * self.width,
            y: self.height - (point.y - self.y_range.min) / self.y_range.span() * self.height,
        }
    }

    /// Map a canvas position back to data space.
    pub fn to_data(&self, pos: CanvasPos) -> ChartPoint {
        ChartPoint {
            x: self.x_range.min + pos.x / self.width * self.x_range.span(),
            y: self.y_range.min + (self.height - pos.y) / self.height * self.y_range.span(),
        }
    }

    /// Index of the nearest point within `radius` pixels of `pos`.
    ///
    /// Ties go to the lowest index.
    pub fn nearest_within(&self, pos: CanvasPos, radius: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, point) in self.points.iter().enumerate() {
            let at = self.to_canvas(*point);
            let distance = (at.x - pos.x).hypot(at.y - pos.y);
            if distance > radius {
                continue;
            }
            match best {
                Some((_, d)) if d <= distance => {}
                _ => best = Some((index, distance)),
            }
        }
        best.map(|(index, _)| index)
    }

    /// Highlight a point. Returns false if it was already highlighted or
    /// does not exist.
    pub fn highlight(&mut self, index: usize) -> bool {
        index < self.points.len() && self.highlighted.insert(index)
    }

    pub fn is_highlighted(&self, index: usize) -> bool {
        self.highlighted.contains(&index)
    }

    pub fn highlighted(&self) -> impl Iterator<Item = usize> + '_ {
        self.highlighted.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plot() -> Plot {
        let points = vec![
            ChartPoint { x: 0.0, y: 50.0 },
            ChartPoint { x: 1.0, y: 75.0 },
            ChartPoint { x: 2.0, y: 100.0 },
        ];
        Plot::new(RSS_SERIES_LABEL, points, 200.0, 100.0)
    }

    #[test]
    fn test_corners_map_to_canvas_edges() {
        let plot = sample_plot();
        assert_eq!(plot.to_canvas(ChartPoint { x: 0.0, y: 50.0 }), CanvasPos { x: 0.0, y: 100.0 });
        assert_eq!(plot.to_canvas(ChartPoint { x: 2.0, y: 100.0 }), CanvasPos { x: 200.0, y: 0.0 });
        assert_eq!(plot.to_canvas(ChartPoint { x: 1.0, y: 75.0 }), CanvasPos { x: 100.0, y: 50.0 });
    }

    #[test]
    fn test_to_data_inverts_to_canvas() {
        let plot = sample_plot();
        let data = plot.to_data(CanvasPos { x: 100.0, y: 50.0 });
        assert!((data.x - 1.0).abs() < 1e-9);
        assert!((data.y - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_hit_within_radius() {
        let plot = sample_plot();
        assert_eq!(plot.nearest_within(CanvasPos { x: 103.0, y: 54.0 }, 10.0), Some(1));
        assert_eq!(plot.nearest_within(CanvasPos { x: 150.0, y: 50.0 }, 10.0), None);
    }

    #[test]
    fn test_hit_prefers_nearest() {
        let points = vec![ChartPoint { x: 0.0, y: 0.0 }, ChartPoint { x: 1.0, y: 0.0 }];
        let plot = Plot::new("s", points, 10.0, 10.0);
        // Points sit at x=0 and x=10; 7 is closer to the second.
        assert_eq!(plot.nearest_within(CanvasPos { x: 7.0, y: 5.0 }, 10.0), Some(1));
    }

    #[test]
    fn test_single_point_range_is_widened() {
        let plot = Plot::new("s", vec![ChartPoint { x: 4.0, y: 9.0 }], 100.0, 100.0);
        assert_eq!(plot.x_range(), AxisRange { min: 3.0, max: 5.0 });
        assert_eq!(plot.to_canvas(ChartPoint { x: 4.0, y: 9.0 }), CanvasPos { x: 50.0, y: 50.0 });
    }

    #[test]
    fn test_empty_plot() {
        let plot = Plot::new("s", Vec::new(), 100.0, 100.0);
        assert_eq!(plot.y_range(), AxisRange { min: 0.0, max: 1.0 });
        assert_eq!(plot.nearest_within(CanvasPos { x: 0.0, y: 0.0 }, 50.0), None);
    }

    #[test]
    fn test_highlight_is_idempotent() {
        let mut plot = sample_plot();
        assert!(plot.highlight(2));
        assert!(!plot.highlight(2));
        assert!(!plot.highlight(9));
        assert!(plot.is_highlighted(2));
        assert_eq!(plot.highlighted().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_default_style() {
        let plot = sample_plot();
        assert!(plot.style().lines && plot.style().points);
        assert_eq!(plot.label(), "RSS/K");
    }
}
