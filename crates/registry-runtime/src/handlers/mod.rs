//! # Event Handlers
//!
//! Handlers that turn partition notifications into follow-up transactions,
//! and the metrics endpoint that reports on them.

pub mod metrics;
pub mod relay;

pub use metrics::{metrics_router, serve_metrics};
pub use relay::{RegionEndpoint, Relay, RelayOutcome, RelayStep};
