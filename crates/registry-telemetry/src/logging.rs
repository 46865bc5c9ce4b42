//! Structured logging.
//!
//! Human-readable output by default; JSON with target, thread id and
//! source location when `json_logs` is set.

use crate::{TelemetryConfig, TelemetryError};
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level when both are present.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    let result = if config.json_logs {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .try_init()
    } else {
        fmt().with_env_filter(env_filter).with_target(false).try_init()
    };

    result.map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}
