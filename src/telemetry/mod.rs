//! Telemetry module
//!
//! Structured logging setup; gauge and counter names live where they are
//! recorded (the `metrics` facade has no registration step).

mod logging;

pub use logging::init_logging;

use crate::config::TelemetryConfig;

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    init_logging(&config.log_level)
}
