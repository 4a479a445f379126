//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all item handlers
//! - Wire up middleware (request ID, tracing, timeout, metrics)
//! - Bind server to listener
//! - Stop accepting and drain on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, middleware, routing::get, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics::track_requests;
use crate::observability::tracing::request_span;
use crate::observability::HandlerTracer;
use crate::store::ItemStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ItemStore>,
    pub tracer: HandlerTracer,
}

impl AppState {
    pub fn new(store: Arc<dyn ItemStore>, tracer: HandlerTracer) -> Self {
        Self { store, tracer }
    }
}

/// HTTP server for the items API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server over the given store.
    pub fn new(config: &AppConfig, store: Arc<dyn ItemStore>) -> Self {
        let state = AppState::new(store, HandlerTracer::from_config(&config.tracing));
        let router = build_router(state, Duration::from_secs(config.timeouts.request_secs));
        Self { router }
    }

    /// Run the server until `shutdown` fires, accepting connections on the
    /// given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
///
/// Layer order, outermost first: request ID assignment, request ID echo,
/// request span, timeout. The echo sits outside the timeout so 408s carry
/// the ID too. Metrics wrap every route and the fallback, so unmatched
/// paths are counted under `unmatched`.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(handlers::hello))
        .route(
            "/api/items",
            get(handlers::list_items).post(handlers::add_item),
        )
        .route(
            "/api/items/{id}",
            get(handlers::get_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .layer(middleware::from_fn(track_requests))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(propagate_request_id_layer())
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    request_timeout,
                )),
        )
}
