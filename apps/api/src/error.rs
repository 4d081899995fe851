//! API error types and their HTTP mapping.
//!
//! Status codes are assigned here and nowhere else:
//!
//! | kind                         | status |
//! |------------------------------|--------|
//! | authentication failures      | 401    |
//! | lookup misses                | 404    |
//! | invalid request content      | 422    |
//! | workflow/persistence faults  | 500    |
//! | database unreachable         | 503    |
//!
//! Server-side faults are logged with full detail and answered with a
//! generic message; internals never reach the wire.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::auth::AuthError;
use crate::purchase::CheckoutError;
use vend_db::DbError;

/// API-boundary errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Token missing, unknown, expired, or malformed.
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// Lookup miss; the payload names what was missing ("Product").
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Request content failed validation.
    #[error("invalid request: {0}")]
    Invalid(String),

    /// Purchase workflow failure (including compensated partial failures).
    #[error("purchase failed: {0}")]
    Checkout(CheckoutError),

    /// Direct persistence failure outside the workflow.
    #[error("database error: {0}")]
    Database(#[from] DbError),

    /// Database unreachable.
    #[error("service unavailable")]
    Unavailable,
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match err {
            // Invalid carts are the caller's fault, not a server fault.
            CheckoutError::Invalid(core) => ApiError::Invalid(core.to_string()),
            other => ApiError::Checkout(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            // Signing failures are server faults that happen to travel
            // inside AuthError; everything else in there is a 401.
            ApiError::Auth(AuthError::Signing(msg)) => {
                error!(error = %msg, "token signing failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
            ApiError::Auth(auth) => (StatusCode::UNAUTHORIZED, auth.to_string()),

            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),

            ApiError::Invalid(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),

            ApiError::Checkout(err) => {
                error!(error = %err, "purchase workflow failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "purchase failed".to_string())
            }

            ApiError::Database(err) => {
                error!(error = %err, "database operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }

            ApiError::Unavailable => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
