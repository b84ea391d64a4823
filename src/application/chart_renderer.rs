// Chart renderer - Draws a current/scenario comparison onto a surface
use crate::application::drawing_surface::{
    line, rect_path, DrawingSurface, Stroke, Surfaces, TextAnchor, TextStyle,
};
use crate::domain::prediction::Annotation;
use crate::domain::sensitivity::Metric;
use crate::domain::series::{Series, SERIES_LEN};
use kurbo::{BezPath, Point, Rect};

const PLOT_LEFT: f64 = 60.0;
const PLOT_RIGHT_PAD: f64 = 20.0;
const PLOT_TOP: f64 = 30.0;
const PLOT_BOTTOM_PAD: f64 = 50.0;
const HOURS: f64 = (SERIES_LEN - 1) as f64;
const HOUR_STEP: usize = 4;
const MARKER_RADIUS: f64 = 4.0;

const OVERLAY_WIDTH: f64 = 180.0;
const OVERLAY_HEIGHT: f64 = 120.0;

const BASELINE_STROKE: &str = "#64748b";
const BASELINE_FILL: &str = "rgba(148, 163, 184, 0.3)";
const SCENARIO_STROKE: &str = "#2563eb";
const SCENARIO_FILL: &str = "rgba(37, 99, 235, 0.3)";
pub const TEXT_MUTED: &str = "#374151";
pub const TEXT_GOOD: &str = "#16a34a";
pub const TEXT_BAD: &str = "#dc2626";

/// Y axis range and tick spacing for one metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSpec {
    pub max: f64,
    pub grid_step: f64,
    pub label_step: f64,
    pub title: &'static str,
}

impl AxisSpec {
    pub fn for_metric(metric: Metric) -> Self {
        match metric {
            Metric::Bsw => Self {
                max: 0.8,
                grid_step: 0.1,
                label_step: 0.1,
                title: "BS&W (%)",
            },
            Metric::Salt => Self {
                max: 1.0,
                grid_step: 0.1,
                label_step: 0.2,
                title: "Salt (PTB)",
            },
        }
    }

    fn ticks(&self, step: f64) -> impl Iterator<Item = f64> + '_ {
        let count = (self.max / step).round() as usize;
        (0..=count).map(move |i| i as f64 * step)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLine {
    pub text: String,
    pub color: &'static str,
}

impl OverlayLine {
    pub fn new(text: String, color: &'static str) -> Self {
        Self { text, color }
    }
}

/// Everything one chart frame needs
#[derive(Debug, Clone)]
pub struct ChartFrame<'a> {
    pub axis: AxisSpec,
    pub current: &'a Series,
    pub scenario: &'a Series,
    pub overlay_title: &'a str,
    pub overlay: &'a [OverlayLine],
    pub annotation: Option<&'a Annotation>,
}

/// Maps hours and metric values to surface coordinates
#[derive(Debug, Clone, Copy)]
struct Layout {
    width: f64,
    height: f64,
    max: f64,
}

impl Layout {
    fn x(&self, hour: f64) -> f64 {
        PLOT_LEFT + hour / HOURS * (self.width - PLOT_LEFT - PLOT_RIGHT_PAD)
    }

    fn y(&self, value: f64) -> f64 {
        self.axis_y() - value / self.max * (self.height - PLOT_TOP - PLOT_BOTTOM_PAD)
    }

    fn axis_y(&self) -> f64 {
        self.height - PLOT_BOTTOM_PAD
    }

    fn points(&self, series: &Series) -> Vec<Point> {
        series
            .points
            .iter()
            .map(|p| Point::new(self.x(f64::from(p.hour_index)), self.y(p.value)))
            .collect()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ChartRenderer;

impl ChartRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw `frame` onto the surface registered as `surface_id`.
    ///
    /// Returns `false` without touching anything when no such surface exists.
    pub fn render(
        &self,
        surfaces: &mut Surfaces,
        surface_id: &str,
        frame: &ChartFrame<'_>,
    ) -> bool {
        let Some(surface) = surfaces.get_mut(surface_id) else {
            tracing::warn!("Chart surface {} not found, skipping render", surface_id);
            return false;
        };
        self.draw(surface, frame);
        true
    }

    pub fn draw(&self, surface: &mut dyn DrawingSurface, frame: &ChartFrame<'_>) {
        let size = surface.size();
        let layout = Layout {
            width: size.width,
            height: size.height,
            max: frame.axis.max,
        };

        surface.clear();
        surface.fill_gradient(Rect::new(0.0, 0.0, size.width, size.height), "#f8fafc", "#ffffff");

        self.draw_grid(surface, &layout, &frame.axis);
        self.draw_axes(surface, &layout, &frame.axis);

        // Baseline first so the scenario sits on top.
        let current = layout.points(frame.current);
        let scenario = layout.points(frame.scenario);
        self.draw_curve(surface, &layout, &current, BASELINE_STROKE, BASELINE_FILL);
        self.draw_curve(surface, &layout, &scenario, SCENARIO_STROKE, SCENARIO_FILL);
        self.draw_markers(surface, &current, BASELINE_STROKE);
        self.draw_markers(surface, &scenario, SCENARIO_STROKE);

        self.draw_overlay(surface, &layout, frame);
    }

    fn draw_grid(&self, surface: &mut dyn DrawingSurface, layout: &Layout, axis: &AxisSpec) {
        let grid = Stroke::new("#e2e8f0", 1.0).with_opacity(0.5);

        for hour in (0..SERIES_LEN).step_by(HOUR_STEP) {
            let x = layout.x(hour as f64);
            let gridline = line(Point::new(x, PLOT_TOP), Point::new(x, layout.axis_y()));
            surface.stroke_path(&gridline, &grid);
        }

        for value in axis.ticks(axis.grid_step) {
            let y = layout.y(value);
            surface.stroke_path(
                &line(Point::new(PLOT_LEFT, y), Point::new(layout.width - PLOT_RIGHT_PAD, y)),
                &grid,
            );
        }
    }

    fn draw_axes(&self, surface: &mut dyn DrawingSurface, layout: &Layout, axis: &AxisSpec) {
        let axis_stroke = Stroke::new("#475569", 2.0);
        let axis_y = layout.axis_y();
        let x_axis = line(Point::new(0.0, axis_y), Point::new(layout.width, axis_y));
        let y_axis = line(Point::new(PLOT_LEFT, PLOT_TOP), Point::new(PLOT_LEFT, axis_y));
        surface.stroke_path(&x_axis, &axis_stroke);
        surface.stroke_path(&y_axis, &axis_stroke);

        let title = TextStyle::new("#334155", 14.0).bold().anchor(TextAnchor::Middle);
        surface.text(axis.title, Point::new(20.0, layout.height / 2.0), &title.rotate(-90.0));
        surface.text("Time (Hours)", Point::new(layout.width / 2.0, layout.height - 15.0), &title);

        let hour_label = TextStyle::new("#64748b", 12.0).anchor(TextAnchor::Middle);
        for hour in (0..SERIES_LEN).step_by(HOUR_STEP) {
            surface.text(
                &format!("{}h", hour),
                Point::new(layout.x(hour as f64), layout.height - 30.0),
                &hour_label,
            );
        }

        let value_label = TextStyle::new("#64748b", 12.0).anchor(TextAnchor::End);
        for value in axis.ticks(axis.label_step) {
            surface.text(
                &format!("{:.1}", value),
                Point::new(PLOT_LEFT - 10.0, layout.y(value) + 4.0),
                &value_label,
            );
        }
    }

    fn draw_curve(
        &self,
        surface: &mut dyn DrawingSurface,
        layout: &Layout,
        points: &[Point],
        stroke: &str,
        fill: &str,
    ) {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return;
        };

        let mut area = BezPath::new();
        area.move_to((first.x, layout.axis_y()));
        for p in points {
            area.line_to(*p);
        }
        area.line_to((last.x, layout.axis_y()));
        area.close_path();
        surface.fill_path(&area, fill, 0.2);

        surface.stroke_path(&smooth_path(points), &Stroke::new(stroke, 3.0));
    }

    fn draw_markers(&self, surface: &mut dyn DrawingSurface, points: &[Point], fill: &str) {
        let ring = Stroke::new("#ffffff", 2.0);
        for p in points.iter().step_by(HOUR_STEP) {
            surface.circle(*p, MARKER_RADIUS, fill, &ring);
        }
    }

    fn draw_overlay(
        &self,
        surface: &mut dyn DrawingSurface,
        layout: &Layout,
        frame: &ChartFrame<'_>,
    ) {
        let x0 = layout.width - OVERLAY_WIDTH - 20.0;
        let panel = Rect::new(x0, 20.0, x0 + OVERLAY_WIDTH, 20.0 + OVERLAY_HEIGHT);
        surface.fill_path(&rect_path(panel), "#ffffff", 1.0);
        surface.stroke_path(&rect_path(panel), &Stroke::new("#e5e7eb", 1.0));

        surface.text(
            frame.overlay_title,
            Point::new(x0 + 10.0, 40.0),
            &TextStyle::new("#1f2937", 12.0).bold(),
        );
        for (i, entry) in frame.overlay.iter().enumerate() {
            surface.text(
                &entry.text,
                Point::new(x0 + 10.0, 60.0 + 15.0 * i as f64),
                &TextStyle::new(entry.color, 11.0),
            );
        }

        if let Some(note) = frame.annotation {
            let color = if note.improvement { "#10b981" } else { "#ef4444" };
            surface.text(
                &note.text(),
                Point::new(layout.width / 2.0, 50.0),
                &TextStyle::new(color, 12.0).bold().anchor(TextAnchor::Middle),
            );
        }
    }
}

/// Quadratic smoothing through midpoints; passes through the first and last point.
pub fn smooth_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some(first) = points.first() else {
        return path;
    };
    path.move_to(*first);

    for pair in points.windows(2).skip(1) {
        let (control, next) = (pair[0], pair[1]);
        path.quad_to(control, control.midpoint(next));
    }
    if let Some(last) = points.last().filter(|_| points.len() > 1) {
        path.quad_to(*last, *last);
    }
    path
}
