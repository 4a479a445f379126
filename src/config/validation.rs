//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid, ratios in range)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::{AppConfig, StoreBackend};

/// A single semantic problem with a configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.store.backend == StoreBackend::Mongo && config.store.uri.trim().is_empty() {
        errors.push(ValidationError::new("store.uri", "must not be empty"));
    }

    if config.store.collection.trim().is_empty() {
        errors.push(ValidationError::new("store.collection", "must not be empty"));
    }

    if config.tracing.enabled {
        if config.tracing.agent_host.trim().is_empty() {
            errors.push(ValidationError::new("tracing.agent_host", "must not be empty"));
        }
        if config.tracing.agent_port == 0 {
            errors.push(ValidationError::new("tracing.agent_port", "must be non-zero"));
        }
    }

    if !(0.0..=1.0).contains(&config.tracing.sample_ratio) {
        errors.push(ValidationError::new(
            "tracing.sample_ratio",
            format!("{} is outside [0, 1]", config.tracing.sample_ratio),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
