//! Route handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::http::server::AppState;

/// `GET /`
pub async fn index() -> &'static str {
    "ok"
}

/// `GET /logs`: parsed records from the active file, oldest first.
pub async fn get_logs(State(state): State<AppState>) -> Response {
    match state.store.read_all().await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to read request log");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error reading log file").into_response()
        }
    }
}
