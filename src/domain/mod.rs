// Domain layer - Process models and pure calculations
pub mod inputs;
pub mod monitoring;
pub mod optimization;
pub mod optimizer;
pub mod parameters;
pub mod prediction;
pub mod priority;
pub mod sensitivity;
pub mod series;
