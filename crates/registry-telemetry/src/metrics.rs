//! Prometheus metrics for the registry.
//!
//! All metrics follow the naming convention: `lr_<area>_<metric>_total`

use lazy_static::lazy_static;
use prometheus::{CounterVec, Encoder, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Registry-local metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Notifications handled by the relay, by event name
    pub static ref NOTIFICATIONS_RELAYED: CounterVec = CounterVec::new(
        Opts::new("lr_relay_notifications_total", "Notifications handled by the relay"),
        &["event"]
    ).expect("metric creation failed");

    /// Handshake steps completed, by step (issued, bound, verified, rejected)
    pub static ref HANDSHAKE_STEPS: CounterVec = CounterVec::new(
        Opts::new("lr_handshake_steps_total", "Handshake steps completed"),
        &["step"]
    ).expect("metric creation failed");

    /// Idempotency guards hit on redelivery, by guard
    pub static ref GUARD_HITS: CounterVec = CounterVec::new(
        Opts::new("lr_idempotency_guard_hits_total", "Redelivered steps answered by a guard"),
        &["guard"]
    ).expect("metric creation failed");

    /// Relay steps that failed with a non-guard error, by step
    pub static ref RELAY_FAILURES: CounterVec = CounterVec::new(
        Opts::new("lr_relay_failures_total", "Relay steps that failed"),
        &["step"]
    ).expect("metric creation failed");
}

/// Register all metrics with [`REGISTRY`]. Safe to call more than once.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(NOTIFICATIONS_RELAYED.clone()),
        Box::new(HANDSHAKE_STEPS.clone()),
        Box::new(GUARD_HITS.clone()),
        Box::new(RELAY_FAILURES.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all registered metrics in the Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
