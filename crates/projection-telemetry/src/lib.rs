//! # Projection Telemetry
//!
//! Logging and metrics for the token projection.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use projection_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     // ...
//!     println!("{}", projection_telemetry::render_metrics()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TP_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `TP_JSON_LOGS` | `false` | JSON output |
//! | `TP_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `TP_SERVICE_NAME` | `token-projection` | Name in the startup line |

#![warn(missing_docs)]

mod config;
mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    register_metrics, render_metrics, EVENTS_APPLIED, EVENTS_PASSED_THROUGH, EVENTS_SKIPPED,
    SNAPSHOTS_PERSISTED,
};
pub use tracing_setup::init_tracing;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Subscriber could not be installed
    #[error("Failed to initialize tracing: {0}")]
    TracingInit(String),

    /// Counter registration or encoding failed
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Register metrics, then install the tracing subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_tracing(config)
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
}
