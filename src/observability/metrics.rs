//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define service metrics (request count, latency)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `items_api_requests_total` (counter): total requests by method, route, status
//! - `items_api_request_duration_seconds` (histogram): latency distribution
//!
//! # Design Decisions
//! - Routes are labelled by their matched pattern, not the raw path, so item
//!   ids never explode label cardinality

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one completed request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!("items_api_requests_total", &labels).increment(1);
    metrics::histogram!("items_api_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

/// Matched route pattern, or `unmatched` for requests that fell through
/// to the fallback.
pub(crate) fn route_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string())
}

/// Middleware recording count and latency for every routed request.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = route_label(&request);

    let response = next.run(request).await;
    record_request(&method, &route, response.status().as_u16(), start);
    response
}
