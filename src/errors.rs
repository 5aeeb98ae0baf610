// Error types for smart-assist

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum SmartAssistError {
    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error reading or writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },
    #[snafu(display("Could not parse config file"))]
    ConfigParseError { source: serde_json::Error },
    #[snafu(display("Invalid configuration value: {field} - {reason}"))]
    InvalidConfig { field: String, reason: String },

    // UI errors
    #[snafu(display("Could not start the dashboard window: {description}"))]
    WindowStartError { description: String },
}
