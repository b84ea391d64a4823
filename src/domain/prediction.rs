// Prediction snapshot derived from the sensitivity model
use crate::domain::series::MetricProfile;
use serde::Serialize;

/// Percentage points of breach risk per unit of BS&W change
const RISK_GAIN: f64 = 100.0;
/// Percentage points of efficiency per unit of BS&W change
const EFFICIENCY_GAIN: f64 = 250.0;
/// Risk changes smaller than this are reported as stable
const STABLE_RISK_BAND: f64 = 0.5;
/// Impacts smaller than this get no chart annotation
const ANNOTATION_THRESHOLD: f64 = 0.002;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskDirection {
    Stable,
    Increased,
    Decreased,
}

impl RiskDirection {
    pub fn label(&self) -> &'static str {
        match self {
            RiskDirection::Stable => "Stable",
            RiskDirection::Increased => "Increased",
            RiskDirection::Decreased => "Decreased",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EfficiencyDirection {
    Improved,
    Reduced,
}

impl EfficiencyDirection {
    pub fn label(&self) -> &'static str {
        match self {
            EfficiencyDirection::Improved => "Improved",
            EfficiencyDirection::Reduced => "Reduced",
        }
    }
}

/// Canonical prediction values shown in the cards and the chart overlay
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricSnapshot {
    pub predicted_bsw: f64,
    pub bsw_change: f64,
    pub predicted_salt: f64,
    pub salt_change: f64,
    pub breach_risk_delta: f64,
    pub risk_direction: RiskDirection,
    pub efficiency_delta: f64,
    pub efficiency_direction: EfficiencyDirection,
}

impl MetricSnapshot {
    pub fn from_impacts(bsw_base: f64, bsw_impact: f64, salt_base: f64, salt_impact: f64) -> Self {
        let breach_risk_delta = bsw_impact * RISK_GAIN;
        let risk_direction = if breach_risk_delta.abs() < STABLE_RISK_BAND {
            RiskDirection::Stable
        } else if breach_risk_delta > 0.0 {
            RiskDirection::Increased
        } else {
            RiskDirection::Decreased
        };

        // Lower BS&W means less rework, so efficiency moves the other way.
        let efficiency_delta = (0.0 - bsw_impact) * EFFICIENCY_GAIN;
        let efficiency_direction = if efficiency_delta >= 0.0 {
            EfficiencyDirection::Improved
        } else {
            EfficiencyDirection::Reduced
        };

        // Predictions stay inside the same bounds the chart series are clamped to.
        let predicted_bsw = MetricProfile::BSW.clamp(bsw_base + bsw_impact);
        let predicted_salt = MetricProfile::SALT.clamp(salt_base + salt_impact);

        Self {
            predicted_bsw,
            bsw_change: predicted_bsw - bsw_base,
            predicted_salt,
            salt_change: predicted_salt - salt_base,
            breach_risk_delta,
            risk_direction,
            efficiency_delta,
            efficiency_direction,
        }
    }

    pub fn bsw_line(&self) -> String {
        format!("BS&W: {:.2}% {:+.2}%", self.predicted_bsw, self.bsw_change)
    }

    pub fn salt_line(&self) -> String {
        format!("Salt: {:.2} PTB {:+.2} PTB", self.predicted_salt, self.salt_change)
    }

    pub fn risk_line(&self) -> String {
        format!(
            "Breach Risk: {:+.1}% {}",
            self.breach_risk_delta,
            self.risk_direction.label()
        )
    }

    pub fn efficiency_line(&self) -> String {
        format!(
            "Efficiency: {:+.1}% {}",
            self.efficiency_delta,
            self.efficiency_direction.label()
        )
    }
}

/// Headline shown above the chart when the scenario moves the metric noticeably.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub improvement: bool,
    pub change_percent: f64,
}

impl Annotation {
    /// Lower is better for both tracked metrics.
    pub fn for_impact(base_value: f64, impact: f64) -> Option<Self> {
        if impact.abs() <= ANNOTATION_THRESHOLD || base_value == 0.0 {
            return None;
        }
        Some(Self {
            improvement: impact < 0.0,
            change_percent: (impact / base_value * 100.0).abs(),
        })
    }

    pub fn text(&self) -> String {
        let label = if self.improvement { "Improvement" } else { "Degradation" };
        format!("{}: {:.1}%", label, self.change_percent)
    }
}
