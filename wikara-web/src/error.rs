//! Error types for wikara-web

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// wikara-common error
    #[error("Common error: {0}")]
    Common(#[from] wikara_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use wikara_common::Error as CommonError;

        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Common(ref err) => match err {
                CommonError::Http(_) | CommonError::Upstream(_) => {
                    (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", err.to_string())
                }
                CommonError::Config(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "NOT_CONFIGURED",
                    err.to_string(),
                ),
                CommonError::Json(_) | CommonError::Io(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "COMMON_ERROR",
                    err.to_string(),
                ),
            },
        };

        if status.is_server_error() {
            error!(code = error_code, "{}", message);
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
