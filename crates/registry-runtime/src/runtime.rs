//! # Registry Runtime
//!
//! ## Startup Sequence
//!
//! 1. Wire partitions from [`RuntimeConfig`]
//! 2. Register every region with the authority
//! 3. Spawn the relay on the shared bus
//! 4. Serve `/metrics` when a metrics port is configured
//!
//! ## Shutdown Sequence
//!
//! 1. Signal the relay and the metrics listener to stop
//! 2. Wait for both tasks to finish

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::container::{RegistryContainer, RuntimeConfig};
use crate::handlers::serve_metrics;

/// A running registry: partitions plus the relay task.
pub struct RegistryRuntime {
    container: Arc<RegistryContainer>,
    shutdown_tx: watch::Sender<bool>,
    relay_task: Mutex<Option<JoinHandle<()>>>,
    metrics_task: Mutex<Option<JoinHandle<()>>>,
    metrics_addr: Mutex<Option<SocketAddr>>,
}

impl RegistryRuntime {
    /// Runtime over freshly wired partitions.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let container =
            RegistryContainer::new(config).context("Failed to wire registry partitions")?;
        Ok(Self::with_container(container))
    }

    /// Runtime over an existing container.
    pub fn with_container(container: RegistryContainer) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            container: Arc::new(container),
            shutdown_tx,
            relay_task: Mutex::new(None),
            metrics_task: Mutex::new(None),
            metrics_addr: Mutex::new(None),
        }
    }

    /// Register regions and start the relay.
    pub async fn start(&self) -> Result<()> {
        info!("===========================================");
        info!("  Land Registry Runtime v{}", crate::VERSION);
        info!("===========================================");

        let descriptors = self
            .container
            .register_regions()
            .await
            .context("Failed to register regions with the authority")?;
        for descriptor in &descriptors {
            info!(
                region = %descriptor.region_code,
                name = %descriptor.name,
                partition = %descriptor.partition,
                "[runtime] Region online"
            );
        }

        let relay = self
            .container
            .relay()
            .context("Failed to resolve relay credentials")?;
        let subscription = self.container.relay_subscription();
        let shutdown_rx = self.shutdown_tx.subscribe();
        *self.relay_task.lock() = Some(tokio::spawn(relay.run(subscription, shutdown_rx)));

        if let Some(port) = self.container.config.metrics_port {
            self.start_metrics(port).await?;
        }

        info!(
            regions = descriptors.len(),
            authority = %self.container.config.authority_organization,
            "[runtime] Registry running"
        );
        Ok(())
    }

    async fn start_metrics(&self, port: u16) -> Result<()> {
        let listener = TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port)))
            .await
            .with_context(|| format!("Failed to bind metrics port {port}"))?;
        *self.metrics_addr.lock() = listener.local_addr().ok();

        let shutdown_rx = self.shutdown_tx.subscribe();
        *self.metrics_task.lock() = Some(tokio::spawn(async move {
            if let Err(e) = serve_metrics(listener, shutdown_rx).await {
                error!("Metrics listener failed: {}", e);
            }
        }));
        Ok(())
    }

    /// Address `/metrics` is served on, once started.
    pub fn metrics_addr(&self) -> Option<SocketAddr> {
        *self.metrics_addr.lock()
    }

    /// Stop the relay and the metrics listener and wait for both.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let task = self.relay_task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                error!("Relay task ended abnormally: {}", e);
            }
        }

        let task = self.metrics_task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                error!("Metrics task ended abnormally: {}", e);
            }
        }
        *self.metrics_addr.lock() = None;
        info!("Shutdown complete");
    }

    /// Shared partition container.
    pub fn container(&self) -> Arc<RegistryContainer> {
        Arc::clone(&self.container)
    }
}
