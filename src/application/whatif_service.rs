// What-if controller - Recomputes predictions and redraws charts on every change
use crate::application::chart_renderer::{
    AxisSpec, ChartFrame, ChartRenderer, OverlayLine, TEXT_BAD, TEXT_GOOD, TEXT_MUTED,
};
use crate::application::drawing_surface::Surfaces;
use crate::domain::inputs::OperatingPoint;
use crate::domain::optimization::{OptimizationSummary, SALT_CHART_BASE};
use crate::domain::parameters::{Parameter, ParameterSet};
use crate::domain::prediction::{Annotation, MetricSnapshot};
use crate::domain::sensitivity::{impact, Metric};
use crate::domain::series::{synthesize, MetricProfile, NoiseSource, SeriesPair};
use serde::Serialize;

pub const STATUS_READY: &str = "Ready";
pub const STATUS_CHANGED: &str = "Parameters changed - ready to simulate";
pub const STATUS_RESET: &str = "Reset to current settings";
pub const STATUS_COMPLETE: &str = "Simulation complete";

/// Salt average changes below this percentage are shown as no change
const NEUTRAL_SALT_BAND: f64 = 0.05;

/// Id of the surface each metric's chart is drawn on
pub fn surface_id(metric: Metric) -> &'static str {
    match metric {
        Metric::Bsw => "whatIfChart",
        Metric::Salt => "saltPredictionChart",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricView {
    pub metric: Metric,
    pub base_value: f64,
    pub impact: f64,
    pub series: SeriesPair,
    pub annotation: Option<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhatIfView {
    pub current: ParameterSet,
    pub scenario: ParameterSet,
    pub snapshot: MetricSnapshot,
    pub bsw: MetricView,
    pub salt: MetricView,
    pub status: &'static str,
}

/// Everything the results dashboard knows, owned by one controller.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub point: OperatingPoint,
    pub summary: OptimizationSummary,
    pub scenario: ParameterSet,
    pub status: &'static str,
}

impl DashboardState {
    pub fn new(mut point: OperatingPoint) -> Self {
        point.current = point.current.or_fallback(&ParameterSet::default());
        Self {
            summary: OptimizationSummary::compute(&point),
            scenario: point.current,
            point,
            status: STATUS_READY,
        }
    }

    pub fn current(&self) -> &ParameterSet {
        &self.point.current
    }

    pub fn base_value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Bsw => self.summary.bsw,
            Metric::Salt => SALT_CHART_BASE,
        }
    }
}

pub struct WhatIfController {
    state: DashboardState,
    view: WhatIfView,
    noise: Box<dyn NoiseSource>,
    renderer: ChartRenderer,
    surfaces: Surfaces,
}

impl std::fmt::Debug for WhatIfController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatIfController")
            .field("state", &self.state)
            .field("surfaces", &self.surfaces)
            .finish_non_exhaustive()
    }
}

impl WhatIfController {
    pub fn new(
        point: OperatingPoint,
        mut noise: Box<dyn NoiseSource>,
        surfaces: Surfaces,
    ) -> Self {
        let state = DashboardState::new(point);
        let view = compute_view(&state, noise.as_mut());
        let mut controller = Self {
            state,
            view,
            noise,
            renderer: ChartRenderer::new(),
            surfaces,
        };
        controller.render();
        controller
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn view(&self) -> &WhatIfView {
        &self.view
    }

    /// Apply one slider or input change. A missing or non-finite value keeps
    /// the last good value for that parameter; the pipeline still reruns.
    pub fn apply_change(&mut self, parameter: Parameter, value: Option<f64>) -> &WhatIfView {
        if !self.state.scenario.with_value(parameter, value) {
            tracing::warn!(
                "Ignoring non-numeric value for {}, keeping {}",
                parameter,
                self.state.scenario.get(parameter)
            );
        }
        self.state.status = STATUS_CHANGED;
        self.recompute()
    }

    /// Put the scenario back on the current operating point.
    pub fn reset(&mut self) -> &WhatIfView {
        self.state.scenario = self.state.point.current;
        self.state.status = STATUS_RESET;
        self.recompute()
    }

    pub fn simulate(&mut self) -> &WhatIfView {
        self.state.status = STATUS_COMPLETE;
        self.recompute()
    }

    /// Start over from a newly submitted operating point.
    pub fn reseed(&mut self, point: OperatingPoint) -> &WhatIfView {
        self.state = DashboardState::new(point);
        self.recompute()
    }

    /// Encoded contents of a metric's chart surface, if it exists.
    pub fn chart(&self, metric: Metric) -> Option<String> {
        self.surfaces.get(surface_id(metric)).map(|s| s.encode())
    }

    fn recompute(&mut self) -> &WhatIfView {
        self.view = compute_view(&self.state, self.noise.as_mut());
        tracing::debug!(
            "Recomputed what-if: bsw impact {:.4}, salt impact {:.4}",
            self.view.bsw.impact,
            self.view.salt.impact
        );
        self.render();
        &self.view
    }

    fn render(&mut self) {
        let bsw_overlay = bsw_overlay(&self.view.snapshot);
        let salt_overlay = salt_overlay(&self.view.salt.series);

        for (view, title, overlay) in [
            (&self.view.bsw, "Prediction Results", &bsw_overlay),
            (&self.view.salt, "Salt Prediction Results", &salt_overlay),
        ] {
            let frame = ChartFrame {
                axis: AxisSpec::for_metric(view.metric),
                current: &view.series.current,
                scenario: &view.series.scenario,
                overlay_title: title,
                overlay,
                annotation: view.annotation.as_ref(),
            };
            self.renderer.render(&mut self.surfaces, surface_id(view.metric), &frame);
        }
    }
}

fn metric_view(
    state: &DashboardState,
    metric: Metric,
    noise: &mut dyn NoiseSource,
) -> MetricView {
    let base_value = state.base_value(metric);
    let impact = impact(state.current(), &state.scenario, &metric.coefficients());
    let series = synthesize(base_value, impact, &MetricProfile::for_metric(metric), noise);
    MetricView {
        metric,
        base_value,
        impact,
        series,
        annotation: match metric {
            Metric::Bsw => Annotation::for_impact(base_value, impact),
            Metric::Salt => None,
        },
    }
}

fn compute_view(state: &DashboardState, noise: &mut dyn NoiseSource) -> WhatIfView {
    let bsw = metric_view(state, Metric::Bsw, noise);
    let salt = metric_view(state, Metric::Salt, noise);
    let snapshot =
        MetricSnapshot::from_impacts(bsw.base_value, bsw.impact, salt.base_value, salt.impact);
    WhatIfView {
        current: *state.current(),
        scenario: state.scenario,
        snapshot,
        bsw,
        salt,
        status: state.status,
    }
}

fn bsw_overlay(snapshot: &MetricSnapshot) -> Vec<OverlayLine> {
    vec![
        OverlayLine::new(snapshot.bsw_line(), TEXT_MUTED),
        OverlayLine::new(snapshot.salt_line(), TEXT_MUTED),
        OverlayLine::new(snapshot.risk_line(), TEXT_MUTED),
        OverlayLine::new(snapshot.efficiency_line(), TEXT_MUTED),
    ]
}

fn salt_overlay(series: &SeriesPair) -> Vec<OverlayLine> {
    let avg_current = series.current.mean();
    let avg_scenario = series.scenario.mean();
    let improvement = if avg_current > 0.0 {
        (avg_current - avg_scenario) / avg_current * 100.0
    } else {
        0.0
    };
    let (sign, verdict, color) = if improvement.abs() < NEUTRAL_SALT_BAND {
        ("", "No Change", TEXT_MUTED)
    } else if improvement > 0.0 {
        ("-", "Improvement", TEXT_GOOD)
    } else {
        ("+", "Degradation", TEXT_BAD)
    };

    vec![
        OverlayLine::new(format!("Current Avg: {:.3} PTB", avg_current), TEXT_MUTED),
        OverlayLine::new(format!("Scenario Avg: {:.3} PTB", avg_scenario), TEXT_MUTED),
        OverlayLine::new(format!("Change: {}{:.1}%", sign, improvement.abs()), color),
        OverlayLine::new(verdict.to_string(), color),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::{Silent, UniformNoise, SERIES_LEN};
    use crate::infrastructure::svg_canvas::SvgCanvas;

    fn reference_point() -> OperatingPoint {
        OperatingPoint {
            current: ParameterSet::new(60.0, 120.0, 28.0, 2.0, 60000.0),
            ..OperatingPoint::default()
        }
    }

    fn surfaces() -> Surfaces {
        let mut surfaces = Surfaces::new();
        for metric in Metric::ALL {
            surfaces.insert(surface_id(metric), Box::new(SvgCanvas::new(800.0, 400.0)));
        }
        surfaces
    }

    #[test]
    fn test_initial_view_is_neutral() {
        let controller = WhatIfController::new(reference_point(), Box::new(Silent), surfaces());
        let view = controller.view();
        assert_eq!(view.bsw.impact, 0.0);
        assert_eq!(view.salt.impact, 0.0);
        assert_eq!(view.scenario, view.current);
        assert_eq!(view.status, STATUS_READY);
        assert!(view.bsw.annotation.is_none());
    }

    #[test]
    fn test_wash_change_end_to_end() {
        let mut controller = WhatIfController::new(reference_point(), Box::new(Silent), surfaces());
        let base = controller.state().summary.bsw;

        let view = controller.apply_change(Parameter::WashPercent, Some(4.0)).clone();
        assert!((view.bsw.impact - (-0.08)).abs() < 1e-12);
        assert_eq!(view.status, STATUS_CHANGED);

        let profile = MetricProfile::BSW;
        assert_eq!(view.bsw.series.scenario.points.len(), SERIES_LEN);
        for point in &view.bsw.series.scenario.points {
            let harmonic = profile.periodic(f64::from(point.hour_index));
            let expected = (base - 0.08 + 0.7 * harmonic).clamp(0.0, 0.8);
            assert!((point.value - expected).abs() < 1e-12);
        }

        // The overlay and the JSON view read the same snapshot.
        let svg = controller.chart(Metric::Bsw).unwrap();
        assert!(svg.contains(&xml_text(&view.snapshot.bsw_line())));
        assert!(svg.contains(&xml_text(&view.snapshot.risk_line())));
    }

    fn xml_text(s: &str) -> String {
        s.replace('&', "&amp;")
    }

    #[test]
    fn test_bad_value_keeps_last_good_value() {
        let mut controller = WhatIfController::new(reference_point(), Box::new(Silent), surfaces());
        controller.apply_change(Parameter::VoltageKv, Some(30.0));
        let view = controller.apply_change(Parameter::VoltageKv, None).clone();
        assert_eq!(view.scenario.voltage_kv, 30.0);

        let view = controller.apply_change(Parameter::VoltageKv, Some(f64::NAN)).clone();
        assert_eq!(view.scenario.voltage_kv, 30.0);
        assert!(view.bsw.impact.is_finite());
        assert!(view.bsw.series.scenario.values().all(f64::is_finite));
    }

    #[test]
    fn test_reset_restores_current() {
        let mut controller = WhatIfController::new(reference_point(), Box::new(Silent), surfaces());
        controller.apply_change(Parameter::FlowBpd, Some(45000.0));
        let view = controller.reset();
        assert_eq!(view.scenario, view.current);
        assert_eq!(view.bsw.impact, 0.0);
        assert_eq!(view.status, STATUS_RESET);
    }

    #[test]
    fn test_missing_surfaces_do_not_fail() {
        let noise = Box::new(UniformNoise::seeded(1));
        let mut controller = WhatIfController::new(reference_point(), noise, Surfaces::new());
        let view = controller.apply_change(Parameter::TemperatureC, Some(125.0)).clone();
        assert!(view.bsw.impact < 0.0);
        assert_eq!(controller.chart(Metric::Bsw), None);
    }

    #[test]
    fn test_salt_chart_overlay() {
        let mut controller = WhatIfController::new(reference_point(), Box::new(Silent), surfaces());
        controller.apply_change(Parameter::WashPercent, Some(3.0));
        let svg = controller.chart(Metric::Salt).unwrap();
        assert!(svg.contains("Salt Prediction Results"));
        assert!(svg.contains("Improvement"));
    }

    #[test]
    fn test_large_wash_increase_stays_on_chart() {
        let mut controller =
            WhatIfController::new(OperatingPoint::default(), Box::new(Silent), surfaces());
        let base = controller.state().summary.bsw;
        let view = controller.apply_change(Parameter::WashPercent, Some(10.0)).clone();

        assert!(base + view.bsw.impact < 0.0);
        assert_eq!(view.snapshot.predicted_bsw, 0.0);
        assert_eq!(view.snapshot.bsw_line(), format!("BS&W: 0.00% -{:.2}%", base));
        assert!(view.bsw.series.scenario.values().all(|v| v == 0.0));

        let svg = controller.chart(Metric::Bsw).unwrap();
        assert!(svg.contains(&xml_text(&view.snapshot.bsw_line())));
    }

    #[test]
    fn test_unchanged_salt_is_neutral() {
        let mut controller = WhatIfController::new(reference_point(), Box::new(Silent), surfaces());
        let svg = controller.chart(Metric::Salt).unwrap();
        assert!(svg.contains("No Change"));
        assert!(svg.contains("Change: 0.0%"));
        assert!(!svg.contains("Degradation"));

        controller.apply_change(Parameter::WashPercent, Some(3.0));
        controller.reset();
        let svg = controller.chart(Metric::Salt).unwrap();
        assert!(svg.contains("No Change"));
        assert!(!svg.contains("Improvement"));
    }

    #[test]
    fn test_reseed_uses_new_operating_point() {
        let mut controller = WhatIfController::new(reference_point(), Box::new(Silent), surfaces());
        controller.apply_change(Parameter::WashPercent, Some(3.0));

        let mut point = reference_point();
        point.current.wash_percent = 3.0;
        let view = controller.reseed(point);
        assert_eq!(view.current.wash_percent, 3.0);
        assert_eq!(view.scenario.wash_percent, 3.0);
        assert_eq!(view.salt.impact, 0.0);
    }
}
