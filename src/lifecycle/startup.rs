//! Startup orchestration.
//!
//! Runs in dependency order: configuration is validated, metrics start, the
//! log store is opened (creating or repairing the active file), and the
//! listener binds last so no traffic arrives before the log is ready.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{validate_config, AppConfig, ConfigError};
use crate::http::HttpServer;
use crate::log_store::{LogStore, LogStoreError};
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to initialize request log: {0}")]
    LogStore(#[from] LogStoreError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Validate `config`, open the log store and bind the listener.
pub async fn start(config: AppConfig) -> Result<(HttpServer, TcpListener), StartupError> {
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        log_dir = %config.log.log_dir.display(),
        max_lines = config.log.max_lines,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Checked by validation.
        if let Ok(addr) = config.observability.metrics_address.parse::<SocketAddr>() {
            metrics::init_metrics(addr);
        }
    }

    let store = Arc::new(LogStore::open(&config.log)?);

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    Ok((HttpServer::new(config, store), listener))
}
