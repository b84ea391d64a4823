// Application configuration - config/app.toml layered with DESALTER_* env vars
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub chart: ChartSettings,
    pub simulation: SimulationSettings,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Memory,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ChartSettings {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SimulationSettings {
    /// Fixes chart noise, optimizer sampling and monitoring drift when set
    pub seed: Option<u64>,
    pub step_delay_ms: u64,
    pub prediction_interval_ms: u64,
    pub maintenance_interval_ms: u64,
}

impl SimulationSettings {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    pub fn prediction_interval(&self) -> Duration {
        Duration::from_millis(self.prediction_interval_ms)
    }

    pub fn maintenance_interval(&self) -> Duration {
        Duration::from_millis(self.maintenance_interval_ms)
    }

    /// Drift tickers need a non-zero period.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.prediction_interval_ms > 0,
            "simulation.prediction_interval_ms must be greater than 0"
        );
        anyhow::ensure!(
            self.maintenance_interval_ms > 0,
            "simulation.maintenance_interval_ms must be greater than 0"
        );
        Ok(())
    }
}

fn builder() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(config::Config::builder()
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("storage.backend", "file")?
        .set_default("storage.path", "data/state.json")?
        .set_default("chart.width", 800.0)?
        .set_default("chart.height", 400.0)?
        .set_default("simulation.step_delay_ms", 1500_i64)?
        .set_default("simulation.prediction_interval_ms", 3000_i64)?
        .set_default("simulation.maintenance_interval_ms", 5000_i64)?)
}

/// Load `config/app` (any format the `config` crate knows, optional) and
/// `DESALTER_*` overrides, e.g. `DESALTER_SERVER__BIND=127.0.0.1:9000`.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = builder()?
        .add_source(config::File::with_name("config/app").required(false))
        .add_source(
            config::Environment::with_prefix("DESALTER")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    parse(settings)
}

fn parse(settings: config::Config) -> anyhow::Result<AppConfig> {
    let config: AppConfig = settings.try_deserialize()?;
    config.simulation.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> config::Config {
        builder()
            .unwrap()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = parse(builder().unwrap().build().unwrap()).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.chart.width, 800.0);
        assert_eq!(config.simulation.seed, None);
        assert_eq!(config.simulation.step_delay(), Duration::from_millis(1500));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let toml = r#"
            [storage]
            backend = "memory"

            [simulation]
            seed = 42
            step_delay_ms = 0
        "#;
        let config = parse(from_toml(toml)).unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.path, PathBuf::from("data/state.json"));
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.simulation.step_delay(), Duration::ZERO);
        assert_eq!(config.simulation.prediction_interval_ms, 3000);
    }

    #[test]
    fn test_zero_drift_interval_is_rejected() {
        let err = parse(from_toml("[simulation]\nprediction_interval_ms = 0")).unwrap_err();
        assert!(err.to_string().contains("prediction_interval_ms"));

        let err = parse(from_toml("[simulation]\nmaintenance_interval_ms = 0")).unwrap_err();
        assert!(err.to_string().contains("maintenance_interval_ms"));

        let config = parse(from_toml("[simulation]\nprediction_interval_ms = 1")).unwrap();
        assert_eq!(config.simulation.prediction_interval(), Duration::from_millis(1));
    }
}
