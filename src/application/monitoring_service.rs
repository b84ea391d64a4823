// Monitoring service - Breach predictions and equipment health with live drift
use crate::domain::monitoring::{
    AssetFilter, ComponentHealth, HealthStatus, MaintenancePanel, PredictionPanel,
};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Shortest tick the drift tasks accept
const MIN_DRIFT_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionsView {
    #[serde(flatten)]
    pub panel: PredictionPanel,
    pub as_of: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaintenanceView {
    pub overall_score: f64,
    pub overall_status: HealthStatus,
    pub downtime_risk: u32,
    pub filter: AssetFilter,
    pub components: Vec<ComponentHealth>,
    pub as_of: DateTime<Utc>,
}

#[derive(Clone, Default)]
pub struct MonitoringService {
    predictions: Arc<RwLock<PredictionPanel>>,
    maintenance: Arc<RwLock<MaintenancePanel>>,
}

impl MonitoringService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn predictions(&self) -> PredictionsView {
        PredictionsView {
            panel: self.predictions.read().await.clone(),
            as_of: Utc::now(),
        }
    }

    pub async fn maintenance(&self, filter: AssetFilter) -> MaintenanceView {
        let panel = self.maintenance.read().await;
        MaintenanceView {
            overall_score: panel.overall_score(),
            overall_status: panel.overall_status(),
            downtime_risk: panel.downtime_risk,
            filter,
            components: panel.filtered(filter).into_iter().cloned().collect(),
            as_of: Utc::now(),
        }
    }

    /// Start the two drift tasks. Dropping the handles does not stop them;
    /// abort them to stop.
    pub fn spawn_jitter(
        &self,
        prediction_every: Duration,
        maintenance_every: Duration,
        seed: Option<u64>,
    ) -> [JoinHandle<()>; 2] {
        let prediction_every = prediction_every.max(MIN_DRIFT_PERIOD);
        let maintenance_every = maintenance_every.max(MIN_DRIFT_PERIOD);
        let rng = |offset: u64| match seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(offset)),
            None => StdRng::from_entropy(),
        };

        let predictions = self.predictions.clone();
        let mut prediction_rng = rng(1);
        let prediction_task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(prediction_every);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                predictions.write().await.jitter(&mut prediction_rng);
            }
        });

        let maintenance = self.maintenance.clone();
        let mut maintenance_rng = rng(2);
        let maintenance_task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(maintenance_every);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let mut panel = maintenance.write().await;
                panel.jitter(&mut maintenance_rng);
                tracing::debug!(
                    "Maintenance drift: overall {:.1}, downtime risk {}",
                    panel.overall_score(),
                    panel.downtime_risk
                );
            }
        });

        tracing::info!(
            "Monitoring drift started (predictions every {:?}, maintenance every {:?})",
            prediction_every,
            maintenance_every
        );
        [prediction_task, maintenance_task]
    }
}
