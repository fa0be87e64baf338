//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - `RUST_LOG` overrides the configured level when set

use thiserror::Error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Target used for the per-request CSV lines echoed to the console.
pub const REQUEST_LOG_TARGET: &str = "request_log";

/// Errors from logging initialization.
#[derive(Error, Debug)]
pub enum LogInitError {
    #[error("Failed to parse log filter: {0}")]
    FilterError(String),

    #[error("Failed to set global subscriber: {0}")]
    SetGlobalError(String),
}

/// Install the global tracing subscriber.
pub fn init(config: &ObservabilityConfig) -> Result<(), LogInitError> {
    let filter = build_env_filter(&config.log_level)?;

    match config.log_format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true))
            .try_init(),
    }
    .map_err(|e| LogInitError::SetGlobalError(e.to_string()))
}

fn build_env_filter(level: &str) -> Result<EnvFilter, LogInitError> {
    let directives = std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string());
    EnvFilter::try_new(&directives).map_err(|e| LogInitError::FilterError(e.to_string()))
}
