// Linear sensitivity model for the tracked quality metrics
use super::parameters::{Parameter, ParameterSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Quality output tracked by the what-if panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Bsw,
    Salt,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Bsw, Metric::Salt];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Bsw => "bsw",
            Metric::Salt => "salt",
        }
    }

    pub fn coefficients(&self) -> ImpactCoefficients {
        match self {
            Metric::Bsw => ImpactCoefficients::BSW,
            Metric::Salt => ImpactCoefficients::SALT,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bsw" => Ok(Metric::Bsw),
            "salt" => Ok(Metric::Salt),
            _ => Err(()),
        }
    }
}

/// Signed weight per parameter; metric units per parameter unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpactCoefficients {
    pub demulsifier_ppm: f64,
    pub temperature_c: f64,
    pub voltage_kv: f64,
    pub wash_percent: f64,
    pub flow_bpd: f64,
}

impl ImpactCoefficients {
    // Demo constants, no process model behind them.
    pub const BSW: ImpactCoefficients = ImpactCoefficients {
        demulsifier_ppm: -0.003,
        temperature_c: -0.004,
        voltage_kv: -0.02,
        wash_percent: -0.04,
        flow_bpd: 0.000003,
    };

    pub const SALT: ImpactCoefficients = ImpactCoefficients {
        demulsifier_ppm: 0.003,
        temperature_c: -0.002,
        voltage_kv: -0.015,
        wash_percent: -0.08,
        flow_bpd: 0.000002,
    };

    pub fn weight(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::DemulsifierPpm => self.demulsifier_ppm,
            Parameter::TemperatureC => self.temperature_c,
            Parameter::VoltageKv => self.voltage_kv,
            Parameter::WashPercent => self.wash_percent,
            Parameter::FlowBpd => self.flow_bpd,
        }
    }
}

/// Weighted sum of the per-parameter deltas between `scenario` and `current`.
pub fn impact(
    current: &ParameterSet,
    scenario: &ParameterSet,
    coefficients: &ImpactCoefficients,
) -> f64 {
    let total: f64 = Parameter::ALL
        .into_iter()
        .zip(scenario.delta_from(current))
        .map(|(p, delta)| delta * coefficients.weight(p))
        .sum();
    // Folds -0.0 into 0.0 so a neutral scenario never prints as "-0.00".
    total + 0.0
}
