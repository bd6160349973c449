//! Telemetry module
//!
//! Logging and conversion metrics

mod logging;
pub(crate) mod metrics;

pub use crate::config::LogFormat;
pub use logging::init_logging;

use crate::config::TelemetryConfig;

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    init_logging(&config.log_level, config.log_format)
}
