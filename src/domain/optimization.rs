// Optimization summary shown on the results dashboard
use super::inputs::OperatingPoint;
use serde::Serialize;

/// Reference plant before optimization
pub const BASELINE_BSW: f64 = 1.2;
pub const BASELINE_SALT: f64 = 0.6;

/// Salt chart base value (PTB)
pub const SALT_CHART_BASE: f64 = 0.25;

/// Optimized BS&W lands at this fraction of the target
const TARGET_REDUCTION: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Setpoints {
    pub demulsifier_ppm: f64,
    pub temperature_c: f64,
    pub voltage_kv: f64,
    pub wash_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptimizationSummary {
    pub bsw: f64,
    pub bsw_within_spec: bool,
    pub salt: f64,
    pub salt_within_spec: bool,
    pub setpoints: Setpoints,
    pub bsw_improvement_pct: f64,
    pub salt_improvement_pct: f64,
}

impl OptimizationSummary {
    pub fn compute(point: &OperatingPoint) -> Self {
        let p = &point.current;

        let flow_factor = (p.flow_bpd - 50000.0) * 0.0000005;
        let temp_factor = (p.temperature_c - 110.0) * 0.002;
        let voltage_factor = (p.voltage_kv - 25.0) * -0.005;
        let ppm_factor = (p.demulsifier_ppm - 50.0) * -0.001;

        let raw_bsw = point.target_bsw * TARGET_REDUCTION + flow_factor - temp_factor
            + voltage_factor
            - ppm_factor;
        let bsw = raw_bsw.min(point.target_bsw * 0.8).max(0.05);

        let wash_factor = (p.wash_percent - 1.5) * 0.05;
        let salt_voltage_factor = (p.voltage_kv - 25.0) * -0.01;
        let raw_salt = 0.4 - wash_factor + flow_factor - temp_factor - salt_voltage_factor;
        let salt = raw_salt.min(1.0).max(0.05);

        let setpoints = Setpoints {
            demulsifier_ppm: point.ppm_range.clamp(point.ppm_range.at(0.4).round()),
            temperature_c: point.temp_range.clamp(point.temp_range.at(0.3).round()),
            voltage_kv: point
                .voltage_range
                .clamp((point.voltage_range.max * 0.9).round()),
            wash_percent: point.wash_range.clamp(point.wash_range.at(0.4)),
        };

        Self {
            bsw,
            bsw_within_spec: bsw <= point.target_bsw,
            salt,
            salt_within_spec: salt <= point.target_salt,
            setpoints,
            bsw_improvement_pct: (BASELINE_BSW - bsw) / BASELINE_BSW * 100.0,
            salt_improvement_pct: (BASELINE_SALT - salt) / BASELINE_SALT * 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_operating_point() {
        let summary = OptimizationSummary::compute(&OperatingPoint::default());
        // 0.15 + 0.005 - 0.02 - 0.015 + 0.01
        assert!((summary.bsw - 0.13).abs() < 1e-9, "bsw = {}", summary.bsw);
        assert!(summary.bsw_within_spec);

        // 0.4 - 0.025 + 0.005 - 0.02 + 0.03
        assert!((summary.salt - 0.39).abs() < 1e-9, "salt = {}", summary.salt);
        assert!(!summary.salt_within_spec);

        assert_eq!(summary.setpoints.demulsifier_ppm, 42.0);
        assert_eq!(summary.setpoints.temperature_c, 113.0);
        assert_eq!(summary.setpoints.voltage_kv, 29.0);
        assert!((summary.setpoints.wash_percent - 1.9).abs() < 1e-9);
    }

    #[test]
    fn test_bsw_is_capped_below_target() {
        let mut point = OperatingPoint::default();
        point.current.flow_bpd = 100000.0;
        point.current.temperature_c = 50.0;
        point.current.voltage_kv = 0.0;
        let summary = OptimizationSummary::compute(&point);
        assert!((summary.bsw - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_bsw_has_floor() {
        let mut point = OperatingPoint::default();
        point.current.temperature_c = 200.0;
        point.current.voltage_kv = 50.0;
        let summary = OptimizationSummary::compute(&point);
        assert_eq!(summary.bsw, 0.05);
        assert!(summary.bsw_improvement_pct > 95.0);
    }
}
