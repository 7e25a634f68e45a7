//! API error surface

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors a handler can surface to a client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field is missing or violates its length limit.
    #[error("Invalid input")]
    InvalidInput,

    /// The referenced message does not exist.
    #[error("Message not found")]
    NotFound,

    /// Storage or other internal failure. Detail stays server-side.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidInput => (StatusCode::BAD_REQUEST, "Invalid input"),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Message not found"),
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
