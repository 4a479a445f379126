//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Store connection URI.
pub const ENV_MONGO_URI: &str = "MONGO_URI";
/// Tracing collector host.
pub const ENV_AGENT_HOST: &str = "JAEGER_AGENT_HOST";
/// Tracing collector port.
pub const ENV_AGENT_PORT: &str = "JAEGER_AGENT_PORT";
/// Listener bind address.
pub const ENV_BIND_ADDRESS: &str = "ITEMS_API_BIND";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for environment variable {key}")]
    Env { key: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply process environment
/// overrides, and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Override file values with environment variables looked up through `lookup`.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(uri) = lookup(ENV_MONGO_URI) {
        config.store.uri = uri;
    }
    if let Some(host) = lookup(ENV_AGENT_HOST) {
        config.tracing.agent_host = host;
    }
    if let Some(port) = lookup(ENV_AGENT_PORT) {
        config.tracing.agent_port = port.trim().parse().map_err(|_| ConfigError::Env {
            key: ENV_AGENT_PORT,
            value: port.clone(),
        })?;
    }
    if let Some(bind) = lookup(ENV_BIND_ADDRESS) {
        config.listener.bind_address = bind;
    }
    Ok(())
}
