//! # Land Registry Runtime
//!
//! Entry point: telemetry, partition wiring, region registration, relay.
//!
//! ## Environment
//!
//! - `LR_REGIONS`, `LR_AUTHORITY_ORG`, `LR_ACCESS_POLICY`, `LR_ABANDON_AFTER_SECS`,
//!   `LR_METRICS_PORT` (see [`RuntimeConfig`])
//! - `LR_LOG_LEVEL`, `LR_JSON_LOGS`, `LR_SERVICE_NAME` (see [`TelemetryConfig`])

use anyhow::{Context, Result};
use registry_runtime::{RegistryRuntime, RuntimeConfig};
use registry_telemetry::{init_telemetry, TelemetryConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = init_telemetry(TelemetryConfig::from_env())
        .context("Failed to initialize telemetry")?;

    let config = RuntimeConfig::from_env().context("Invalid runtime configuration")?;
    info!(
        service = %telemetry.config().service_name,
        regions = ?config.regions,
        metrics_port = ?config.metrics_port,
        "Loaded runtime configuration"
    );

    let runtime = RegistryRuntime::new(config)?;
    runtime.start().await?;

    info!("Registry is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown().await;
    drop(telemetry);
    Ok(())
}
