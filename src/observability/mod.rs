//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and middleware produce:
//!     → logging.rs (structured log events, subscriber setup)
//!     → tracing.rs (per-handler spans, OTLP export, trace context extraction)
//!     → metrics.rs (request counters and latency histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → OTLP collector (e.g., Jaeger)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Span export failure never fails a request; the service keeps logging locally
//! - Request ID flows through the request span into every handler span
//! - Metrics are cheap (no-ops until a recorder is installed)

pub mod logging;
pub mod metrics;
pub mod tracing;

pub use self::logging::init_logging;
pub use self::tracing::{HandlerTracer, TelemetryError, TelemetryGuard};
