// Prediction and predictive-maintenance panels
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BreachStatus {
    Excellent,
    #[serde(rename = "Low Risk")]
    LowRisk,
    #[serde(rename = "Medium Risk")]
    MediumRisk,
    #[serde(rename = "High Risk")]
    HighRisk,
}

impl BreachStatus {
    /// `exact_zero_is_excellent` is only set for the salt gauge.
    pub fn classify(probability: f64, exact_zero_is_excellent: bool) -> Self {
        if exact_zero_is_excellent && probability == 0.0 {
            BreachStatus::Excellent
        } else if probability < 1.0 {
            BreachStatus::LowRisk
        } else if probability < 5.0 {
            BreachStatus::MediumRisk
        } else {
            BreachStatus::HighRisk
        }
    }
}

/// Half-circle gauge for time to breach
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreachGauge {
    pub percentage: f64,
    pub needle_deg: f64,
    pub display: String,
    pub status: String,
}

impl BreachGauge {
    pub fn new(percentage: f64, status: &str) -> Self {
        let display = if percentage >= 100.0 {
            "— min".to_string()
        } else {
            format!("{} min", ((100.0 - percentage) * 2.4).round())
        };
        Self {
            percentage,
            needle_deg: 180.0 - percentage / 100.0 * 180.0,
            display,
            status: status.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionPanel {
    pub bsw_breach_probability: f64,
    pub salt_breach_probability: f64,
    pub bsw_status: BreachStatus,
    pub salt_status: BreachStatus,
    pub bsw_time_to_breach: BreachGauge,
    pub salt_time_to_breach: BreachGauge,
}

impl Default for PredictionPanel {
    fn default() -> Self {
        let mut panel = Self {
            bsw_breach_probability: 0.5,
            salt_breach_probability: 0.0,
            bsw_status: BreachStatus::LowRisk,
            salt_status: BreachStatus::Excellent,
            bsw_time_to_breach: BreachGauge::new(100.0, "Safe"),
            salt_time_to_breach: BreachGauge::new(100.0, "Excellent"),
        };
        panel.refresh_status();
        panel
    }
}

impl PredictionPanel {
    fn refresh_status(&mut self) {
        self.bsw_status = BreachStatus::classify(self.bsw_breach_probability, false);
        self.salt_status = BreachStatus::classify(self.salt_breach_probability, true);
    }

    /// Live-looking drift of the BS&W breach probability, kept in [0, 2].
    pub fn jitter<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let step = rng.gen_range(-0.05..0.05);
        let next = (self.bsw_breach_probability + step).clamp(0.0, 2.0);
        // Displayed with one decimal.
        self.bsw_breach_probability = (next * 10.0).round() / 10.0;
        self.refresh_status();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentHealth {
    pub id: String,
    pub name: String,
    pub score: f64,
    pub days_to_maintenance: u32,
}

impl ComponentHealth {
    pub fn risk(&self) -> RiskLevel {
        if self.score < 30.0 {
            RiskLevel::High
        } else if self.score < 60.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssetFilter {
    #[default]
    All,
    Critical,
    Maintenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    Good,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaintenancePanel {
    pub components: Vec<ComponentHealth>,
    pub downtime_risk: u32,
}

const COMPONENTS: [(&str, &str, f64, u32); 8] = [
    ("electrode", "Electrode Grid", 71.0, 45),
    ("transformer", "Transformer", 89.0, 120),
    ("demulsifier", "Demulsifier Pump", 23.0, 7),
    ("mixing", "Mixing Valve", 56.0, 30),
    ("wash", "Wash Water System", 34.0, 21),
    ("crude", "Crude Feed Quality", 28.0, 14),
    ("corrosion", "Corrosion Probes", 19.0, 5),
    ("control", "Control System", 67.0, 60),
];

impl Default for MaintenancePanel {
    fn default() -> Self {
        Self {
            components: COMPONENTS
                .iter()
                .map(|(id, name, score, days)| ComponentHealth {
                    id: id.to_string(),
                    name: name.to_string(),
                    score: *score,
                    days_to_maintenance: *days,
                })
                .collect(),
            downtime_risk: 35,
        }
    }
}

impl MaintenancePanel {
    pub fn overall_score(&self) -> f64 {
        if self.components.is_empty() {
            return 0.0;
        }
        self.components.iter().map(|c| c.score).sum::<f64>() / self.components.len() as f64
    }

    pub fn overall_status(&self) -> HealthStatus {
        let score = self.overall_score();
        if score >= 80.0 {
            HealthStatus::Good
        } else if score >= 60.0 {
            HealthStatus::Warning
        } else {
            HealthStatus::Critical
        }
    }

    pub fn filtered(&self, filter: AssetFilter) -> Vec<&ComponentHealth> {
        self.components
            .iter()
            .filter(|c| match filter {
                AssetFilter::All => true,
                AssetFilter::Critical => c.risk() == RiskLevel::High,
                AssetFilter::Maintenance => c.days_to_maintenance <= 30,
            })
            .collect()
    }

    /// Each score has a 30% chance of moving by up to ±5%; downtime risk
    /// drifts by up to ±5 points inside [5, 95].
    pub fn jitter<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for component in &mut self.components {
            if rng.gen_bool(0.3) {
                let variation = rng.gen_range(-0.05..0.05);
                let next = component.score * (1.0 + variation);
                component.score = ((next * 10.0).round() / 10.0).clamp(0.0, 100.0);
            }
        }

        let risk = f64::from(self.downtime_risk) + rng.gen_range(-5.0..5.0);
        self.downtime_risk = risk.clamp(5.0, 95.0).round() as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_breach_status_bands() {
        assert_eq!(BreachStatus::classify(0.0, true), BreachStatus::Excellent);
        assert_eq!(BreachStatus::classify(0.0, false), BreachStatus::LowRisk);
        assert_eq!(BreachStatus::classify(0.5, true), BreachStatus::LowRisk);
        assert_eq!(BreachStatus::classify(3.0, false), BreachStatus::MediumRisk);
        assert_eq!(BreachStatus::classify(5.0, false), BreachStatus::HighRisk);
    }

    #[test]
    fn test_gauge_display() {
        let safe = BreachGauge::new(100.0, "Safe");
        assert_eq!(safe.display, "— min");
        assert_eq!(safe.needle_deg, 0.0);

        let half = BreachGauge::new(50.0, "Warning");
        assert_eq!(half.display, "120 min");
        assert_eq!(half.needle_deg, 90.0);
    }

    #[test]
    fn test_prediction_jitter_stays_in_band() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut panel = PredictionPanel::default();
        for _ in 0..1000 {
            panel.jitter(&mut rng);
            assert!((0.0..=2.0).contains(&panel.bsw_breach_probability));
        }
        assert_eq!(panel.salt_status, BreachStatus::Excellent);
    }

    #[test]
    fn test_maintenance_jitter_bounds() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut panel = MaintenancePanel::default();
        for _ in 0..500 {
            panel.jitter(&mut rng);
            assert!((5..=95).contains(&panel.downtime_risk));
            for c in &panel.components {
                assert!((0.0..=100.0).contains(&c.score));
            }
        }
    }

    #[test]
    fn test_overall_health_and_filters() {
        let panel = MaintenancePanel::default();
        // (71 + 89 + 23 + 56 + 34 + 28 + 19 + 67) / 8
        assert!((panel.overall_score() - 48.375).abs() < 1e-9);
        assert_eq!(panel.overall_status(), HealthStatus::Critical);

        let critical: Vec<&str> = panel
            .filtered(AssetFilter::Critical)
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(critical, ["demulsifier", "crude", "corrosion"]);
        assert_eq!(panel.filtered(AssetFilter::Maintenance).len(), 5);
        assert_eq!(panel.filtered(AssetFilter::All).len(), 8);
    }
}
