// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::application::drawing_surface::Surfaces;
use crate::application::input_service::InputService;
use crate::application::monitoring_service::MonitoringService;
use crate::application::optimization_service::OptimizationService;
use crate::application::state_store::StateStore;
use crate::application::whatif_service::{surface_id, WhatIfController};
use crate::domain::sensitivity::Metric;
use crate::domain::series::{NoiseSource, UniformNoise};
use crate::infrastructure::config::{load_app_config, StorageBackend};
use crate::infrastructure::file_store::{JsonFileStore, MemoryStore};
use crate::infrastructure::svg_canvas::SvgCanvas;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    // Load configuration
    let config = load_app_config()?;
    let simulation = &config.simulation;

    // Create store (infrastructure layer)
    let store: Arc<dyn StateStore> = match config.storage.backend {
        StorageBackend::File => {
            tracing::info!("Persisting state to {}", config.storage.path.display());
            Arc::new(JsonFileStore::new(config.storage.path.clone()))
        }
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
    };

    // Create services (application layer)
    let input_service = InputService::new(store);
    let optimization_service =
        OptimizationService::new(input_service.clone(), simulation.step_delay(), simulation.seed);
    let monitoring_service = MonitoringService::new();
    monitoring_service.spawn_jitter(
        simulation.prediction_interval(),
        simulation.maintenance_interval(),
        simulation.seed,
    );

    let mut surfaces = Surfaces::new();
    for metric in Metric::ALL {
        surfaces.insert(
            surface_id(metric),
            Box::new(SvgCanvas::new(config.chart.width, config.chart.height)),
        );
    }
    let noise: Box<dyn NoiseSource> = match simulation.seed {
        Some(seed) => Box::new(UniformNoise::seeded(seed)),
        None => Box::new(UniformNoise::from_entropy()),
    };
    let point = input_service.load_operating_point().await;
    let whatif = WhatIfController::new(point, noise, surfaces);

    // Create application state
    let state = Arc::new(AppState {
        input_service,
        optimization_service,
        monitoring_service,
        whatif: Arc::new(Mutex::new(whatif)),
    });

    // Build router (presentation layer)
    let router = router(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("Starting desalter what-if service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
