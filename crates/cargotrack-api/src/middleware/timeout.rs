//! Per-request deadline.

use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum::http::StatusCode;

use crate::error::ApiErrorResponse;
use crate::state::AppState;

/// Abandons the request after `server.request_timeout_seconds`.
pub async fn request_timeout(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let limit = Duration::from_secs(state.config.server.request_timeout_seconds);
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(timeout_seconds = limit.as_secs(), "Request timed out");
            (
                StatusCode::REQUEST_TIMEOUT,
                Json(ApiErrorResponse {
                    error: "TIMEOUT".to_string(),
                    message: "Request timed out".to_string(),
                }),
            )
                .into_response()
        }
    }
}
