// Monte-Carlo lexicographic optimizer over the input form ranges
use super::inputs::OperatingPoint;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const DEFAULT_DESIGN_FLOW: f64 = 30000.0;

/// Keys the priority list can order the search by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    FlowBpd,
    Temperature,
    Voltage,
    Demulsifier,
    WashPercent,
}

impl Objective {
    /// Flow is the only objective that is maximized.
    pub fn maximize(&self) -> bool {
        matches!(self, Objective::FlowBpd)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candidate {
    pub flow_bpd: f64,
    pub temperature_c: f64,
    pub voltage_kv: f64,
    pub demulsifier_ppm: f64,
    pub wash_percent: f64,
    pub bsw: f64,
    pub feasible: bool,
}

impl Candidate {
    pub fn value(&self, objective: Objective) -> f64 {
        match objective {
            Objective::FlowBpd => self.flow_bpd,
            Objective::Temperature => self.temperature_c,
            Objective::Voltage => self.voltage_kv,
            Objective::Demulsifier => self.demulsifier_ppm,
            Objective::WashPercent => self.wash_percent,
        }
    }
}

/// Empirical BS&W response surface, clipped to [0.05, 5.0].
pub fn bsw_response(
    flow: f64,
    temp: f64,
    voltage: f64,
    ppm: f64,
    wash: f64,
    design_flow: f64,
) -> f64 {
    let mut bsw = 2.8 * (-0.035 * ppm).exp() + 0.10 * (0.18 * ppm).sin();
    bsw *= 1.0 - 0.0020 * (temp - 115.0);
    bsw *= 1.0 - 0.012 * (voltage - 26.0) / 10.0;
    bsw *= 1.0 - 0.06 * (((wash - 1.0) / 1.5).tanh() + 0.6);
    let flow_ratio = flow / design_flow.max(1.0);
    bsw *= 1.0 + 0.35 * (flow_ratio - 1.0);
    bsw.clamp(0.05, 5.0)
}

fn snap(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi > lo { rng.gen_range(lo..hi) } else { lo }
}

/// Draw `n` grid-snapped candidates inside the operating point's ranges.
pub fn sample_candidates<R: Rng + ?Sized>(
    point: &OperatingPoint,
    n: usize,
    design_flow: f64,
    rng: &mut R,
) -> Vec<Candidate> {
    (0..n)
        .map(|_| {
            let flow_bpd = snap(uniform(rng, point.flow_range.min, point.flow_range.max), 100.0);
            let temperature_c = snap(uniform(rng, point.temp_range.min, point.temp_range.max), 1.0);
            let voltage_kv =
                snap(uniform(rng, point.voltage_range.min, point.voltage_range.max), 1.0);
            let demulsifier_ppm = snap(uniform(rng, point.ppm_range.min, point.ppm_range.max), 1.0);
            let wash_percent = snap(uniform(rng, point.wash_range.min, point.wash_range.max), 0.1);

            let bsw = bsw_response(
                flow_bpd,
                temperature_c,
                voltage_kv,
                demulsifier_ppm,
                wash_percent,
                design_flow,
            );

            Candidate {
                flow_bpd,
                temperature_c,
                voltage_kv,
                demulsifier_ppm,
                wash_percent,
                bsw,
                feasible: bsw <= point.target_bsw,
            }
        })
        .collect()
}

/// Best feasible candidate by lexicographic priority, first key most important.
pub fn select_lexicographic(
    candidates: &[Candidate],
    priorities: &[Objective],
) -> Option<Candidate> {
    candidates
        .iter()
        .filter(|c| c.feasible)
        .min_by(|a, b| {
            priorities
                .iter()
                .map(|&key| {
                    let ord = a.value(key).total_cmp(&b.value(key));
                    if key.maximize() { ord.reverse() } else { ord }
                })
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        })
        .copied()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizerOutcome {
    pub samples: usize,
    pub feasible: usize,
    pub best: Option<Candidate>,
}

pub fn optimize<R: Rng + ?Sized>(
    point: &OperatingPoint,
    n: usize,
    priorities: &[Objective],
    rng: &mut R,
) -> OptimizerOutcome {
    let candidates = sample_candidates(point, n, DEFAULT_DESIGN_FLOW, rng);
    OptimizerOutcome {
        samples: candidates.len(),
        feasible: candidates.iter().filter(|c| c.feasible).count(),
        best: select_lexicographic(&candidates, priorities),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn candidate(flow: f64, ppm: f64, wash: f64, feasible: bool) -> Candidate {
        Candidate {
            flow_bpd: flow,
            temperature_c: 110.0,
            voltage_kv: 28.0,
            demulsifier_ppm: ppm,
            wash_percent: wash,
            bsw: 0.3,
            feasible,
        }
    }

    #[test]
    fn test_bsw_response_is_clipped() {
        let low = bsw_response(20000.0, 130.0, 32.0, 90.0, 4.0, DEFAULT_DESIGN_FLOW);
        assert!((0.05..=5.0).contains(&low));

        let high = bsw_response(1_000_000.0, 50.0, 10.0, 0.0, 0.1, DEFAULT_DESIGN_FLOW);
        assert_eq!(high, 5.0);
    }

    #[test]
    fn test_more_demulsifier_lowers_bsw() {
        let lean = bsw_response(30000.0, 115.0, 26.0, 10.0, 1.0, DEFAULT_DESIGN_FLOW);
        let rich = bsw_response(30000.0, 115.0, 26.0, 80.0, 1.0, DEFAULT_DESIGN_FLOW);
        assert!(rich < lean);
    }

    #[test]
    fn test_lexicographic_selection() {
        let candidates = [
            candidate(50000.0, 40.0, 2.0, true),
            candidate(60000.0, 45.0, 2.0, true),
            candidate(60000.0, 30.0, 3.0, true),
            candidate(70000.0, 10.0, 0.5, false),
        ];

        let best = select_lexicographic(&candidates, &[Objective::FlowBpd, Objective::Demulsifier])
            .unwrap();
        assert_eq!((best.flow_bpd, best.demulsifier_ppm), (60000.0, 30.0));

        let best = select_lexicographic(&candidates, &[Objective::WashPercent, Objective::FlowBpd])
            .unwrap();
        assert_eq!((best.flow_bpd, best.wash_percent), (60000.0, 2.0));
    }

    #[test]
    fn test_no_feasible_candidate() {
        let candidates = [candidate(50000.0, 40.0, 2.0, false)];
        assert_eq!(select_lexicographic(&candidates, &[Objective::FlowBpd]), None);
    }

    #[test]
    fn test_samples_stay_on_grid_and_in_range() {
        let point = OperatingPoint::default();
        let mut rng = StdRng::seed_from_u64(11);
        let outcome = optimize(&point, 500, &[Objective::FlowBpd], &mut rng);
        assert_eq!(outcome.samples, 500);
        assert!(outcome.feasible <= outcome.samples);

        let candidates = sample_candidates(&point, 200, DEFAULT_DESIGN_FLOW, &mut rng);
        for c in candidates {
            assert_eq!(c.flow_bpd % 100.0, 0.0);
            assert!(c.flow_bpd >= 20000.0 && c.flow_bpd <= 60000.0);
            assert_eq!(c.temperature_c.fract(), 0.0);
            assert_eq!(c.feasible, c.bsw <= point.target_bsw);
        }
    }
}
