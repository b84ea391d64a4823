// Initial input form model (persisted under `desalterInputs`)
use super::parameters::ParameterSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The input form as the browser stored it. Field names follow the form's
/// element ids, which is why some are not snake_case. Missing fields take
/// their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesalterInputs {
    pub spec_bsw: f64,
    pub spec_salt: f64,
    pub n_samples: u32,
    pub flow_min: f64,
    pub flow_max: f64,
    #[serde(rename = "T_min")]
    pub t_min: f64,
    #[serde(rename = "T_max")]
    pub t_max: f64,
    #[serde(rename = "V_min")]
    pub v_min: f64,
    #[serde(rename = "V_max")]
    pub v_max: f64,
    pub ppm_min: f64,
    pub ppm_max: f64,
    pub wash_min: f64,
    pub wash_max: f64,
    pub use_minimize_wash: bool,
    pub baseline_flow: f64,
    pub baseline_demulsifier: f64,
    pub baseline_temp: f64,
    pub baseline_voltage: f64,
    pub baseline_wash: f64,
}

impl Default for DesalterInputs {
    fn default() -> Self {
        Self {
            spec_bsw: 0.5,
            spec_salt: 5.0,
            n_samples: 3000,
            flow_min: 20000.0,
            flow_max: 60000.0,
            t_min: 105.0,
            t_max: 130.0,
            v_min: 22.0,
            v_max: 32.0,
            ppm_min: 10.0,
            ppm_max: 90.0,
            wash_min: 0.5,
            wash_max: 4.0,
            use_minimize_wash: false,
            baseline_flow: 30000.0,
            baseline_demulsifier: 70.0,
            baseline_temp: 120.0,
            baseline_voltage: 28.0,
            baseline_wash: 2.0,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("{0} min must be less than max.")]
    InvertedRange(&'static str),
    #[error("Target BS&W must be between 0.05 and 2.0%.")]
    SpecBsw,
    #[error("Samples must be between 500 and 10,000.")]
    Samples,
    #[error("Baseline flow must be between 1,000 and 100,000 BPD.")]
    BaselineFlow,
    #[error("Baseline demulsifier must be between 1 and 200 ppm.")]
    BaselineDemulsifier,
    #[error("Baseline temperature must be between 50 and 200°C.")]
    BaselineTemperature,
    #[error("Baseline voltage must be between 10 and 50 kV.")]
    BaselineVoltage,
    #[error("Baseline wash must be between 0.1 and 10%.")]
    BaselineWash,
}

/// Optimizer sample count accepted from the form
pub const SAMPLE_RANGE: std::ops::RangeInclusive<u32> = 500..=10_000;

fn within(value: f64, lo: f64, hi: f64) -> bool {
    (lo..=hi).contains(&value)
}

impl DesalterInputs {
    /// First failing rule wins, in form order.
    pub fn validate(&self) -> Result<(), InputError> {
        let ranges = [
            ("Flow", self.flow_min, self.flow_max),
            ("Temperature", self.t_min, self.t_max),
            ("Voltage", self.v_min, self.v_max),
            ("Demulsifier", self.ppm_min, self.ppm_max),
            ("Wash water", self.wash_min, self.wash_max),
        ];
        for (name, min, max) in ranges {
            let ordered = min < max;
            if !ordered {
                return Err(InputError::InvertedRange(name));
            }
        }

        if !within(self.spec_bsw, 0.05, 2.0) {
            return Err(InputError::SpecBsw);
        }
        if !SAMPLE_RANGE.contains(&self.n_samples) {
            return Err(InputError::Samples);
        }
        if !within(self.baseline_flow, 1000.0, 100000.0) {
            return Err(InputError::BaselineFlow);
        }
        if !within(self.baseline_demulsifier, 1.0, 200.0) {
            return Err(InputError::BaselineDemulsifier);
        }
        if !within(self.baseline_temp, 50.0, 200.0) {
            return Err(InputError::BaselineTemperature);
        }
        if !within(self.baseline_voltage, 10.0, 50.0) {
            return Err(InputError::BaselineVoltage);
        }
        if !within(self.baseline_wash, 0.1, 10.0) {
            return Err(InputError::BaselineWash);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn at(&self, fraction: f64) -> f64 {
        self.min + (self.max - self.min) * fraction
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

/// What the results dashboard works from: the current operating point,
/// the quality targets and the search ranges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatingPoint {
    pub current: ParameterSet,
    pub target_bsw: f64,
    pub target_salt: f64,
    pub flow_range: Range,
    pub temp_range: Range,
    pub voltage_range: Range,
    pub ppm_range: Range,
    pub wash_range: Range,
}

impl Default for OperatingPoint {
    fn default() -> Self {
        Self {
            current: ParameterSet::default(),
            target_bsw: 0.5,
            target_salt: 0.25,
            flow_range: Range::new(20000.0, 60000.0),
            temp_range: Range::new(105.0, 130.0),
            voltage_range: Range::new(22.0, 32.0),
            ppm_range: Range::new(10.0, 90.0),
            wash_range: Range::new(0.5, 4.0),
        }
    }
}

/// A form field counts only when it is a non-zero finite number.
fn field(raw: &serde_json::Value, key: &str, fallback: f64) -> f64 {
    let value = match raw.get(key) {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match value {
        Some(v) if v.is_finite() && v != 0.0 => v,
        _ => fallback,
    }
}

impl OperatingPoint {
    /// Map loosely-typed form JSON onto the dashboard's operating point,
    /// defaulting each field on its own.
    pub fn from_form(raw: &serde_json::Value) -> Self {
        let d = Self::default();
        Self {
            current: ParameterSet::new(
                field(raw, "baseline_demulsifier", d.current.demulsifier_ppm),
                field(raw, "baseline_temp", d.current.temperature_c),
                field(raw, "baseline_voltage", d.current.voltage_kv),
                field(raw, "baseline_wash", d.current.wash_percent),
                field(raw, "baseline_flow", d.current.flow_bpd),
            ),
            target_bsw: field(raw, "spec_bsw", d.target_bsw),
            target_salt: field(raw, "spec_salt", d.target_salt),
            flow_range: Range::new(
                field(raw, "flow_min", d.flow_range.min),
                field(raw, "flow_max", d.flow_range.max),
            ),
            temp_range: Range::new(
                field(raw, "T_min", d.temp_range.min),
                field(raw, "T_max", d.temp_range.max),
            ),
            voltage_range: Range::new(
                field(raw, "V_min", d.voltage_range.min),
                field(raw, "V_max", d.voltage_range.max),
            ),
            ppm_range: Range::new(
                field(raw, "ppm_min", d.ppm_range.min),
                field(raw, "ppm_max", d.ppm_range.max),
            ),
            wash_range: Range::new(
                field(raw, "wash_min", d.wash_range.min),
                field(raw, "wash_max", d.wash_range.max),
            ),
        }
    }
}
