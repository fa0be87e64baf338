//! Configuration validation.
//!
//! Checks that serde cannot express: value ranges, address syntax, and
//! file names that must stay inside the log directory.

use std::net::SocketAddr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("log.max_lines must be at least 2, got {0}")]
    MaxLinesTooSmall(usize),

    #[error("log.log_file_name must not be empty")]
    EmptyFileName,

    #[error("log.log_file_name must be a bare file name, got {0:?}")]
    FileNameHasSeparator(String),

    #[error("{field} is not a valid socket address: {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("observability.log_level is not a valid filter: {0:?}")]
    InvalidLogLevel(String),
}

/// Validate the configuration, collecting every error rather than the first.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.log.max_lines < 2 {
        errors.push(ValidationError::MaxLinesTooSmall(config.log.max_lines));
    }

    let name = &config.log.log_file_name;
    if name.is_empty() {
        errors.push(ValidationError::EmptyFileName);
    } else if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        errors.push(ValidationError::FileNameHasSeparator(name.clone()));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    let obs = &config.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: obs.metrics_address.clone(),
        });
    }

    if EnvFilter::try_new(&obs.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(obs.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
