// Library interface for smart-assist
// Integration tests and benches drive the simulations through it

pub mod errors;
pub mod simulation;
pub mod ui;

// Re-export commonly used types
pub use errors::SmartAssistError;
pub use simulation::{
    DetectionModel, MappingModel, Simulation, StatusModel, SystemMetrics, VoiceAssistant,
};
pub use ui::dashboard::{
    DashboardApp,
    config::{AppConfig, RunOverrides},
};
