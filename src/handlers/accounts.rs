//! Account HTTP handlers.
//!
//! This module implements the account API endpoints:
//! - GET /account/get - Read (and lazily create) the caller's balance
//! - PUT /account/deposit - Apply a signed delta to the caller's balance
//! - PUT /account/withdrawal - Conditional debit for a book order, reported by callback

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
};
use serde::de::DeserializeOwned;

use crate::{
    error::AppError,
    middleware::auth::UserId,
    models::{
        account::{BalanceResponse, DepositRequest},
        withdrawal::WithdrawalRequest,
    },
    services::withdrawal_service,
    state::AppState,
};

/// Get the caller's balance.
///
/// # Endpoint
///
/// `GET /account/get`
///
/// # Response
///
/// - **Success (200 OK)**: `{"balance": 100}`; an unseen user gets an account
///   created with `{"balance": 0}`
/// - **Error (401)**: Missing `X-User-Id`
/// - **Error (500)**: Malformed `X-User-Id` or database error
pub async fn get_balance(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Json<BalanceResponse>, AppError> {
    let (balance, _created) = state.balances.get_or_create(user_id).await?;

    Ok(Json(BalanceResponse { balance }))
}

/// Apply a signed delta to the caller's balance.
///
/// # Endpoint
///
/// `PUT /account/deposit`
///
/// # Request Body
///
/// ```json
/// {
///   "delta": 100
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: Empty body
/// - **Error (400)**: Malformed JSON
/// - **Error (401)**: Missing `X-User-Id`
/// - **Error (500)**: Malformed `X-User-Id` or database error
pub async fn deposit(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let request: DepositRequest = parse_body(&body)?;

    state.balances.apply_delta(user_id, request.delta).await?;

    Ok(StatusCode::OK)
}

/// Withdraw from an account on behalf of a book order.
///
/// # Endpoint
///
/// `PUT /account/withdrawal`
///
/// # Request Body
///
/// ```json
/// {
///   "book_id": 1,
///   "user_id": 42,
///   "withdrawal_sum": 30
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: Debit applied
/// - **Error (400)**: Malformed JSON, no callback is sent
/// - **Error (401)**: Missing `X-User-Id`
/// - **Error (500)**: Insufficient balance or database error
///
/// Every parsed request produces exactly one callback to the order service
/// with `{"book_id", "user_id", "price", "status"}`.
pub async fn withdrawal(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let request: WithdrawalRequest = parse_body(&body)?;

    withdrawal_service::process_withdrawal(&state.balances, &state.notifier, request).await?;

    Ok(StatusCode::OK)
}

/// Decode a JSON body. Any failure, including a missing content type, is a 400.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(error = %e, "failed to parse request body");
        AppError::InvalidRequest(format!("Failed to parse data: {e}"))
    })
}
