use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::validation::ValidationErrors;

/// Everything a handler can fail with, mapped one-to-one onto HTTP statuses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or unknown bearer token.
    #[error("Unauthenticated.")]
    Unauthenticated,

    /// Login with a wrong email/password pair.
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// Authenticated but not allowed (admin gate).
    #[error("Unauthorized")]
    Forbidden,

    /// Resource missing or owned by someone else.
    #[error("{0}")]
    NotFound(String),

    /// Request body failed validation; carries per-field messages.
    #[error("Validation failed")]
    Validation(ValidationErrors),

    /// The upstream activity API could not be reached or answered non-2xx.
    #[error("The activity API is currently unavailable")]
    ActivityUnavailable,

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                json!({ "message": "Unauthenticated." }),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "message": "Invalid login credentials" }),
            ),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                json!({ "message": "Unauthorized" }),
            ),
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, json!({ "message": message }))
            }
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "message": "Validation failed", "errors": errors }),
            ),
            ApiError::ActivityUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({
                    "error": "Could not fetch an activity",
                    "message": "The activity API is currently unavailable"
                }),
            ),
            ApiError::Database(e) => {
                tracing::error!("database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Internal server error" }),
                )
            }
            ApiError::Internal(message) => {
                tracing::error!("{message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
