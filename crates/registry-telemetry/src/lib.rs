//! # Registry Telemetry
//!
//! Structured logging and Prometheus metrics for the registry partitions
//! and the relay.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use registry_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LR_SERVICE_NAME` | `land-registry` | Service name in log lines |
//! | `LR_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter directive |
//! | `LR_JSON_LOGS` | `false` | JSON formatted output |

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    gather_metrics, register_metrics, GUARD_HITS, HANDSHAKE_STEPS, NOTIFICATIONS_RELAYED,
    RELAY_FAILURES,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Metric registration or encoding failed.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Initialize logging and register metrics.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    register_metrics()?;
    init_logging(&config)?;
    tracing::info!(
        service = %config.service_name,
        json = config.json_logs,
        "Telemetry initialized"
    );
    Ok(TelemetryGuard { config })
}

/// Keeps the telemetry configuration alive for the process lifetime.
pub struct TelemetryGuard {
    config: TelemetryConfig,
}

impl TelemetryGuard {
    /// Configuration telemetry was started with.
    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.config.service_name, "Shutting down telemetry...");
    }
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
