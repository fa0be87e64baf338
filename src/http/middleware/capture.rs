//! Request capture middleware.
//!
//! Wraps every route. Once the inner service has produced a response, the
//! request is turned into a [`LogRecord`] and handed to a spawned task, so
//! file I/O never delays the client.

use axum::{
    body::Body,
    extract::{OriginalUri, State},
    http::{header::USER_AGENT, Request, Version},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::http::server::AppState;
use crate::log_store::{LogRecord, LogStore};
use crate::observability::logging::REQUEST_LOG_TARGET;
use crate::observability::metrics;

/// Middleware function recording each completed request.
///
/// The record is taken as soon as the handler returns its response, before
/// the body is streamed. A client that disconnects mid-body is still logged
/// with the handler's status.
pub async fn capture_requests(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let agent = request
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("unknown")
        .to_string();
    let method = request.method().to_string();
    let uri = request
        .extensions()
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or_else(|| request.uri());
    let resource = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    let version = format_version(request.version());

    let response = next.run(request).await;

    let record = LogRecord {
        agent,
        time: Utc::now(),
        method,
        resource,
        version,
        status: response.status().as_u16(),
    };
    let store = state.store.clone();
    tokio::spawn(async move {
        capture(&store, record).await;
    });

    response
}

/// Write one record, rotating first when the active file is full.
///
/// Errors are reported through `tracing` only. The append runs even when
/// rotation failed or was skipped because another task was rotating.
pub async fn capture(store: &LogStore, record: LogRecord) {
    tracing::info!(target: REQUEST_LOG_TARGET, "{}", record.to_csv_line());
    metrics::record_captured(record.status);

    if store.needs_rotation() {
        if let Err(e) = store.rotate().await {
            tracing::error!(error = %e, "Error rotating logs");
        }
    }

    if let Err(e) = store.append(&record).await {
        metrics::record_write_failure();
        tracing::error!(error = %e, "Error writing to log file");
    }
}

/// Protocol label in the `HTTP/major.minor` form.
pub fn format_version(version: Version) -> String {
    let number = match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2.0",
        Version::HTTP_3 => "3.0",
        _ => "1.1",
    };
    format!("HTTP/{number}")
}
