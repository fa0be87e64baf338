//! CSV request log storage.
//!
//! # Data Flow
//! ```text
//! LogRecord (from the capture middleware)
//!     → store.rs (append one CSV line, bump cached line count)
//!     → rotation.rs (active → first backup → second backup → discarded)
//!
//! GET /logs
//!     → store.rs (read active file)
//!     → record.rs (split lines into LogEntry values)
//! ```
//!
//! # Design Decisions
//! - One `LogStore` instance is built at startup and shared via `Arc`
//! - The line count is an in-memory cache, not re-read from disk
//! - Rotation is guarded by an atomic flag; a second caller skips rather than waits
//! - Fields are joined with bare commas; no quoting or escaping

pub mod error;
pub mod paths;
pub mod record;
pub mod rotation;
pub mod store;

pub use error::LogStoreError;
pub use paths::LogPaths;
pub use record::{LogEntry, LogRecord, HEADER};
pub use rotation::Rotation;
pub use store::LogStore;
