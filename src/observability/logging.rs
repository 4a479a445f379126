//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global `tracing` subscriber
//! - Attach the OpenTelemetry layer when span export is enabled
//! - Configure log level and output format
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level
//! - JSON format for production, pretty format for development

use opentelemetry::trace::TracerProvider as _;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{LogFormat, ObservabilityConfig, TracingConfig};
use crate::observability::tracing::{init_tracer_provider, TelemetryError, TelemetryGuard};

/// Install the global subscriber.
///
/// The returned guard owns the tracer provider and must be shut down before
/// exit so buffered spans are flushed.
pub fn init_logging(
    observability: &ObservabilityConfig,
    tracing_config: &TracingConfig,
) -> Result<TelemetryGuard, TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&observability.log_level)?,
    };

    let (provider, export_error) = if tracing_config.enabled {
        match init_tracer_provider(tracing_config) {
            Ok(provider) => (Some(provider), None),
            Err(e) => (None, Some(e)),
        }
    } else {
        (None, None)
    };

    let otel_layer = provider.as_ref().map(|provider| {
        tracing_opentelemetry::layer()
            .with_tracer(provider.tracer(tracing_config.service_name.clone()))
    });

    let fmt_layer = match observability.log_format {
        LogFormat::Json => fmt::layer().json().boxed(),
        LogFormat::Pretty => fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()?;

    match (&provider, export_error) {
        (Some(_), _) => tracing::info!(
            endpoint = %tracing_config.endpoint(),
            service = %tracing_config.service_name,
            "Span export enabled"
        ),
        (None, Some(e)) => tracing::warn!(
            endpoint = %tracing_config.endpoint(),
            error = %e,
            "Span exporter unavailable, continuing without export"
        ),
        (None, None) => tracing::debug!("Span export disabled"),
    }

    Ok(TelemetryGuard::new(provider))
}
