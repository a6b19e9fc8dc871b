//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from a store write or an explicit read
/// - **Authentication Errors**: Missing `X-User-Id` header
/// - **Input Errors**: Malformed header or request body
/// - **Business Outcome**: Withdrawal refused by the conditional debit
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// `X-User-Id` header is absent.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Not authenticated")]
    MissingUserId,

    /// `X-User-Id` header is present but not an integer.
    ///
    /// Returns HTTP 500, as the upstream gateway is trusted to attach a valid id.
    #[error("Got wrong header [X-User-Id]: {0}")]
    InvalidUserId(String),

    /// Request body is invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Withdrawal was not applied, either for lack of funds or a failed write.
    ///
    /// Returns HTTP 500. The saga orchestrator learns the outcome from the
    /// callback, not from this status.
    #[error("Withdrawal refused")]
    WithdrawalRefused,
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `MissingUserId` → 401 Unauthorized
/// - `InvalidRequest` → 400 Bad Request
/// - `InvalidUserId` → 500 Internal Server Error
/// - `WithdrawalRefused` → 500 Internal Server Error
/// - `Database` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::MissingUserId => (
                StatusCode::UNAUTHORIZED,
                "not_authenticated",
                self.to_string(),
            ),
            AppError::InvalidUserId(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "invalid_user_header",
                self.to_string(),
            ),
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::WithdrawalRefused => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "withdrawal_refused",
                self.to_string(),
            ),
            AppError::Database(ref e) => {
                tracing::error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
