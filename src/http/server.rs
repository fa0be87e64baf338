//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request capture)
//! - Bind server to listener
//! - Stop on OS signal or shutdown broadcast

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::http::handlers::{get_logs, index};
use crate::http::middleware::capture_requests;
use crate::lifecycle::signals::shutdown_signal;
use crate::log_store::LogStore;

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<LogStore>,
}

/// HTTP server exposing the request log.
#[derive(Debug)]
pub struct HttpServer {
    router: Router,
    config: AppConfig,
    store: Arc<LogStore>,
}

impl HttpServer {
    /// Create a new HTTP server around an initialized log store.
    pub fn new(config: AppConfig, store: Arc<LogStore>) -> Self {
        let state = AppState {
            store: store.clone(),
        };
        let router = Self::build_router(state);
        Self {
            router,
            config,
            store,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/logs", get(get_logs))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(middleware::from_fn_with_state(state.clone(), capture_requests)),
            )
            .with_state(state)
    }

    /// Run the server until a signal arrives or `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            log_file = %self.store.paths().active.display(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Router with state applied, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn store(&self) -> &Arc<LogStore> {
        &self.store
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
