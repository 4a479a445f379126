//! Distributed tracing support.
//!
//! # Responsibilities
//! - Build the OTLP span exporter and tracer provider
//! - Extract W3C trace context from incoming requests
//! - Create one span per handler invocation, tagged with method and item id
//!
//! # Design Decisions
//! - The handler span factory is injected through `AppState`, not a global
//! - Spans are attached with `Instrument`, so they close when the handler
//!   future completes, whatever the response
//! - Exporter errors are reported by the SDK in the background; they never
//!   reach request handling

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request};
use opentelemetry::propagation::Extractor;
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{self as sdktrace, Sampler, TracerProvider};
use opentelemetry_sdk::{runtime, Resource};
use opentelemetry_semantic_conventions::resource::SERVICE_NAME;
use thiserror::Error;
use tracing::field::Empty;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::config::TracingConfig;
use crate::http::request::request_id;

/// Errors raised while setting up telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("span exporter: {0}")]
    Exporter(#[from] opentelemetry::trace::TraceError),

    #[error("log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Build a tracer provider exporting to the configured OTLP agent.
pub fn init_tracer_provider(config: &TracingConfig) -> Result<TracerProvider, TelemetryError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(config.endpoint())
        .build()?;

    let sampler = if config.sample_ratio >= 1.0 {
        Sampler::AlwaysOn
    } else {
        Sampler::TraceIdRatioBased(config.sample_ratio)
    };
    let resource = Resource::new(vec![KeyValue::new(
        SERVICE_NAME,
        config.service_name.clone(),
    )]);

    #[allow(deprecated)]
    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_config(
            sdktrace::Config::default()
                .with_sampler(sampler)
                .with_resource(resource),
        )
        .build();

    global::set_text_map_propagator(TraceContextPropagator::new());

    Ok(provider)
}

/// Owns the tracer provider for the lifetime of the process.
pub struct TelemetryGuard {
    provider: Option<TracerProvider>,
}

impl TelemetryGuard {
    pub fn new(provider: Option<TracerProvider>) -> Self {
        Self { provider }
    }

    /// Flush buffered spans and stop the exporter.
    pub fn shutdown(self) {
        if let Some(provider) = self.provider {
            if let Err(e) = provider.shutdown() {
                tracing::warn!(error = %e, "Failed to flush spans on shutdown");
            }
        }
    }
}

/// Reads trace context headers from an HTTP header map.
struct HeaderExtractor<'a>(&'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

/// Span covering a whole HTTP request, parented to the caller's trace if the
/// request carries a `traceparent` header.
pub fn request_span(request: &Request<Body>) -> Span {
    let span = tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id(request.headers()).unwrap_or("unknown"),
    );
    let parent = global::get_text_map_propagator(|propagator| {
        propagator.extract(&HeaderExtractor(request.headers()))
    });
    span.set_parent(parent);
    span
}

/// Span factory handed to every item handler.
#[derive(Debug, Clone, Copy)]
pub struct HandlerTracer {
    enabled: bool,
}

impl HandlerTracer {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// A tracer whose spans are all disabled.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn from_config(config: &TracingConfig) -> Self {
        if config.handler_spans {
            Self::new()
        } else {
            Self::disabled()
        }
    }

    /// Start the span for one logical operation.
    ///
    /// The span is reported under `operation` and tagged with the HTTP method
    /// and, for per-item routes, the raw `item_id` path segment.
    pub fn span(&self, operation: &'static str, method: &Method, item_id: Option<&str>) -> Span {
        if !self.enabled {
            return Span::none();
        }
        let span = tracing::info_span!(
            "handler",
            otel.name = operation,
            http.method = %method,
            item_id = Empty,
        );
        if let Some(id) = item_id {
            span.record("item_id", id);
        }
        span
    }
}

impl Default for HandlerTracer {
    fn default() -> Self {
        Self::new()
    }
}
