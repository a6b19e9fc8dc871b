//! User identity middleware.
//!
//! Authentication happens upstream: the gateway attaches the caller's id in
//! the `X-User-Id` header. This module:
//! 1. Rejects requests without the header with HTTP 401
//! 2. Provides the `UserId` extractor that parses the header for handlers

use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, services::callback_service::USER_ID_HEADER};

/// Authenticated caller, parsed from `X-User-Id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub i64);

/// Authentication middleware function.
///
/// Only checks that the header is present. Its value is validated by the
/// `UserId` extractor in handlers that need it.
///
/// # Returns
///
/// - `Ok(Response)` if the header is present (calls next handler)
/// - `Err(AppError::MissingUserId)` otherwise (returns 401)
pub async fn require_user_id(request: Request, next: Next) -> Result<Response, AppError> {
    if !request.headers().contains_key(USER_ID_HEADER) {
        tracing::warn!(uri = %request.uri(), "not authenticated");
        return Err(AppError::MissingUserId);
    }

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or(AppError::MissingUserId)?;

        let raw = value
            .to_str()
            .map_err(|e| AppError::InvalidUserId(e.to_string()))?;

        raw.trim()
            .parse::<i64>()
            .map(UserId)
            .map_err(|e| AppError::InvalidUserId(format!("{raw:?}: {e}")))
    }
}
