//! Tracing subscriber setup: JSON lines on stdout.

use crate::error::ConfigError;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG`, when set, overrides the configured level.
pub fn init(log_level: &str) -> Result<(), ConfigError> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| log_level.to_string());
    let filter = EnvFilter::try_new(&directives).map_err(|e| ConfigError::LogLevel(format!("{}: {}", directives, e)))?;
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| ConfigError::LogLevel(e.to_string()))
}

/// Minimal subscriber used when configuration could not be loaded.
pub fn init_fallback() {
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::new("info"))
        .try_init();
}
