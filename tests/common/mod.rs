//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use items_api::config::{AppConfig, StoreBackend};
use items_api::{HttpServer, ItemStore, MemoryItemStore, Shutdown};
use tokio::net::TcpListener;

/// A running server plus a client pointed at it.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    pub store: Arc<dyn ItemStore>,
    shutdown: Shutdown,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the API on an ephemeral port backed by an in-memory store.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(Arc::new(MemoryItemStore::new())).await
}

/// Start the API on an ephemeral port backed by `store`.
pub async fn spawn_app_with(store: Arc<dyn ItemStore>) -> TestApp {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.store.backend = StoreBackend::Memory;
    config.tracing.enabled = false;
    config.timeouts.request_secs = 5;

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config, store.clone());
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();

    TestApp {
        addr,
        client,
        store,
        shutdown,
    }
}
