// Application state for HTTP handlers
use crate::application::input_service::InputService;
use crate::application::monitoring_service::MonitoringService;
use crate::application::optimization_service::OptimizationService;
use crate::application::whatif_service::WhatIfController;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub input_service: InputService,
    pub optimization_service: OptimizationService,
    pub monitoring_service: MonitoringService,
    pub whatif: Arc<Mutex<WhatIfController>>,
}
