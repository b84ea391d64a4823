// Application layer - Use cases and ports
pub mod chart_renderer;
pub mod drawing_surface;
pub mod input_service;
pub mod monitoring_service;
pub mod optimization_service;
pub mod state_store;
pub mod whatif_service;
