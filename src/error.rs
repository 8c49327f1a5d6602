//! HTTP-facing error type
//!
//! Handlers return `Result<T, AppError>`. Failures are logged in full and
//! the browser only gets a generic JSON message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::core::ChatError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("chat failed: {0}")]
    Chat(#[from] ChatError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Chat(e) => {
                tracing::error!(error = %e, "chat request failed");
                "the assistant is unavailable right now"
            }
        };
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": message })),
        )
            .into_response()
    }
}
