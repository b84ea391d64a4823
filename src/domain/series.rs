// Synthetic 24-hour series for the what-if charts
use super::sensitivity::Metric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::f64::consts::PI;

/// Hours 0..=24 inclusive
pub const SERIES_LEN: usize = 25;

/// Damping applied to the harmonic term on the scenario curve
const SCENARIO_VARIATION: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub hour_index: u32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn mean(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        self.values().sum::<f64>() / self.points.len() as f64
    }
}

/// Shape and bounds of one metric's synthetic signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricProfile {
    /// Daily harmonic amplitude
    pub a1: f64,
    /// Half-day harmonic amplitude
    pub a2: f64,
    /// Noise is drawn uniformly from `[-noise_band / 2, noise_band / 2]`
    pub noise_band: f64,
    pub lo: f64,
    pub hi: f64,
}

impl MetricProfile {
    pub const BSW: MetricProfile = MetricProfile {
        a1: 0.02,
        a2: 0.01,
        noise_band: 0.01,
        lo: 0.0,
        hi: 0.8,
    };

    pub const SALT: MetricProfile = MetricProfile {
        a1: 0.03,
        a2: 0.015,
        noise_band: 0.02,
        lo: 0.0,
        hi: 1.0,
    };

    pub fn for_metric(metric: Metric) -> Self {
        match metric {
            Metric::Bsw => Self::BSW,
            Metric::Salt => Self::SALT,
        }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lo, self.hi)
    }

    /// Deterministic part of the harmonic term at `hour`
    pub fn periodic(&self, hour: f64) -> f64 {
        self.a1 * (2.0 * PI * hour / 24.0).sin() + self.a2 * (2.0 * PI * hour / 12.0).sin()
    }
}

/// Source of the per-point jitter added to the harmonic term.
pub trait NoiseSource: Send {
    /// Uniform sample in `[-half_width, half_width]`
    fn sample(&mut self, half_width: f64) -> f64;
}

/// `StdRng` backed noise; seed it for reproducible charts.
#[derive(Debug)]
pub struct UniformNoise {
    rng: StdRng,
}

impl UniformNoise {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl NoiseSource for UniformNoise {
    fn sample(&mut self, half_width: f64) -> f64 {
        if half_width <= 0.0 {
            return 0.0;
        }
        self.rng.gen_range(-half_width..=half_width)
    }
}

/// No jitter at all
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl NoiseSource for Silent {
    fn sample(&mut self, _half_width: f64) -> f64 {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPair {
    pub current: Series,
    pub scenario: Series,
}

/// Build the current and scenario curves around `base_value`.
///
/// Both curves share the same harmonic draw at each hour so the scenario
/// tracks the baseline shape, shifted by `impact`.
pub fn synthesize(
    base_value: f64,
    impact: f64,
    profile: &MetricProfile,
    noise: &mut dyn NoiseSource,
) -> SeriesPair {
    let mut current = Vec::with_capacity(SERIES_LEN);
    let mut scenario = Vec::with_capacity(SERIES_LEN);

    for i in 0..SERIES_LEN as u32 {
        let harmonic = profile.periodic(f64::from(i)) + noise.sample(profile.noise_band / 2.0);

        current.push(SeriesPoint {
            hour_index: i,
            value: profile.clamp(base_value + harmonic),
        });
        scenario.push(SeriesPoint {
            hour_index: i,
            value: profile.clamp(base_value + impact + harmonic * SCENARIO_VARIATION),
        });
    }

    SeriesPair {
        current: Series { points: current },
        scenario: Series { points: scenario },
    }
}
