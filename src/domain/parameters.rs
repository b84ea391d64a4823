// Process parameter domain model
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the five adjustable desalter parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    DemulsifierPpm,
    TemperatureC,
    VoltageKv,
    WashPercent,
    FlowBpd,
}

impl Parameter {
    pub const ALL: [Parameter; 5] = [
        Parameter::DemulsifierPpm,
        Parameter::TemperatureC,
        Parameter::VoltageKv,
        Parameter::WashPercent,
        Parameter::FlowBpd,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Parameter::DemulsifierPpm => "demulsifier_ppm",
            Parameter::TemperatureC => "temperature_c",
            Parameter::VoltageKv => "voltage_kv",
            Parameter::WashPercent => "wash_percent",
            Parameter::FlowBpd => "flow_bpd",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown process parameter `{0}`")]
pub struct UnknownParameter(pub String);

impl FromStr for Parameter {
    type Err = UnknownParameter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parameter::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownParameter(s.to_string()))
    }
}

/// Values for the five what-if parameters.
///
/// The dashboard keeps two of these: the current operating point and the
/// scenario being previewed. Every field is finite; `with_value` refuses
/// anything else and keeps the previous value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    pub demulsifier_ppm: f64,
    pub temperature_c: f64,
    pub voltage_kv: f64,
    pub wash_percent: f64,
    pub flow_bpd: f64,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            demulsifier_ppm: 60.0,
            temperature_c: 120.0,
            voltage_kv: 28.0,
            wash_percent: 2.0,
            flow_bpd: 60000.0,
        }
    }
}

impl ParameterSet {
    pub fn new(
        demulsifier_ppm: f64,
        temperature_c: f64,
        voltage_kv: f64,
        wash_percent: f64,
        flow_bpd: f64,
    ) -> Self {
        Self {
            demulsifier_ppm,
            temperature_c,
            voltage_kv,
            wash_percent,
            flow_bpd,
        }
    }

    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::DemulsifierPpm => self.demulsifier_ppm,
            Parameter::TemperatureC => self.temperature_c,
            Parameter::VoltageKv => self.voltage_kv,
            Parameter::WashPercent => self.wash_percent,
            Parameter::FlowBpd => self.flow_bpd,
        }
    }

    fn slot(&mut self, parameter: Parameter) -> &mut f64 {
        match parameter {
            Parameter::DemulsifierPpm => &mut self.demulsifier_ppm,
            Parameter::TemperatureC => &mut self.temperature_c,
            Parameter::VoltageKv => &mut self.voltage_kv,
            Parameter::WashPercent => &mut self.wash_percent,
            Parameter::FlowBpd => &mut self.flow_bpd,
        }
    }

    /// Overwrite one field. Returns `false` and leaves the set untouched
    /// when the value is missing or not finite.
    pub fn with_value(&mut self, parameter: Parameter, value: Option<f64>) -> bool {
        match value {
            Some(v) if v.is_finite() => {
                *self.slot(parameter) = v;
                true
            }
            _ => false,
        }
    }

    /// Replace every non-finite field with the matching field of `fallback`.
    pub fn or_fallback(mut self, fallback: &ParameterSet) -> Self {
        for p in Parameter::ALL {
            if !self.get(p).is_finite() {
                *self.slot(p) = fallback.get(p);
            }
        }
        self
    }

    /// Per-parameter `self - baseline`.
    pub fn delta_from(&self, baseline: &ParameterSet) -> [f64; 5] {
        Parameter::ALL.map(|p| self.get(p) - baseline.get(p))
    }
}

/// Parse a raw form value the way a numeric input box would.
pub fn parse_numeric(raw: &serde_json::Value) -> Option<f64> {
    let value = match raw {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    value.is_finite().then_some(value)
}
