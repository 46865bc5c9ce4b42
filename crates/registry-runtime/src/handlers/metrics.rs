//! # Metrics Endpoint
//!
//! Serves the Prometheus text exposition of the registry counters on
//! `GET /metrics`, plus a bare `GET /health`.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use registry_telemetry::gather_metrics;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

/// Content type of the Prometheus text format.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Router exposing the metrics and health routes.
pub fn metrics_router() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/metrics", get(render_metrics))
}

async fn render_metrics() -> Response {
    match gather_metrics() {
        Ok(body) => ([(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            warn!(error = %e, "[metrics] exposition failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Serve [`metrics_router`] on `listener` until `shutdown` turns true.
pub async fn serve_metrics(
    listener: TcpListener,
    mut shutdown: watch::Receiver<bool>,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "[metrics] serving /metrics");
    }
    axum::serve(listener, metrics_router())
        .with_graceful_shutdown(async move {
            while !*shutdown.borrow() {
                if shutdown.changed().await.is_err() {
                    break;
                }
            }
        })
        .await
}
