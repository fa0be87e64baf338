//! HTTP request logger with rotating CSV storage.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ handlers (`/`, `/logs`)
//!                          │
//!                          ▼ response produced
//!                 http::middleware::capture
//!                          │ spawned
//!                          ▼
//!                  log_store::LogStore ──▶ log.csv
//!                          │ line_count >= max_lines
//!                          ▼
//!                  rotation: log.csv → log1.csv → log2.csv → gone
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod log_store;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use log_store::LogStore;
