//! HTTP middleware.

pub mod capture;

pub use capture::{capture, capture_requests, format_version};
