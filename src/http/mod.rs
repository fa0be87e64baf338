//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trace layer)
//!     → middleware/capture.rs (wraps every route)
//!     → handlers.rs (`/` and `/logs`)
//!     → response sent to client
//!     → middleware/capture.rs spawns the CSV write
//! ```

pub mod handlers;
pub mod middleware;
pub mod server;

pub use server::{AppState, HttpServer};
