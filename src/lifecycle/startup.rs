//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize telemetry from the loaded configuration
//! - Construct the configured item store
//! - Start the optional metrics endpoint
//! - Bind the listener and serve until shutdown

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{AppConfig, StoreBackend, StoreConfig};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::{self, TelemetryError};
use crate::store::{ItemStore, MemoryItemStore, MongoItemStore, StoreError};

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("telemetry: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("store: {0}")]
    Store(#[from] StoreError),

    #[error("listener: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the store selected by `config.backend`.
pub async fn connect_store(config: &StoreConfig) -> Result<Arc<dyn ItemStore>, StoreError> {
    let store: Arc<dyn ItemStore> = match config.backend {
        StoreBackend::Mongo => Arc::new(MongoItemStore::connect(config).await?),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory item store; data is lost on exit");
            Arc::new(MemoryItemStore::new())
        }
    };

    if let Err(e) = store.ping().await {
        tracing::warn!(error = %e, "Item store not reachable yet");
    }
    Ok(store)
}

/// Run the service with a validated configuration until a shutdown signal.
pub async fn run(config: AppConfig) -> Result<(), StartupError> {
    let telemetry = observability::init_logging(&config.observability, &config.tracing)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        store = ?config.store.backend,
        request_timeout_secs = config.timeouts.request_secs,
        "items-api starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = observability::metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = connect_store(&config.store).await?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(&config, store);
    let result = server.run(listener, shutdown.subscribe()).await;

    telemetry.shutdown();
    tracing::info!("Shutdown complete");
    result.map_err(StartupError::from)
}
