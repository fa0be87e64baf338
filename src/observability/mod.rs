//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request capture and log store produce:
//!     → logging.rs (diagnostic events, one per captured request)
//!     → metrics.rs (counters and gauges)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
