//! Account data models and API request/response types.
//!
//! This module defines:
//! - `Account`: Database entity representing a user's balance row
//! - `DepositRequest`: Request body for applying a delta
//! - `BalanceResponse`: Response body returned to clients

use serde::{Deserialize, Serialize};

/// Represents an account record from the database.
///
/// # Database Table
///
/// Maps to the `account` table. There is exactly one row per user id,
/// created on the first balance read.
///
/// # Balance Storage
///
/// The balance is a plain signed integer. No floor is enforced, a deposit
/// with a negative delta may take it below zero.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    /// User id attached by the upstream gateway
    pub id: i64,

    /// Current balance
    pub balance: i64,
}

/// Request body for a deposit.
///
/// # JSON Example
///
/// ```json
/// {
///   "delta": 100
/// }
/// ```
///
/// The delta is signed, negative values withdraw without a funds check.
/// A body without `delta` deposits 0.
#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    #[serde(default)]
    pub delta: i64,
}

/// Response body for `GET /account/get`.
///
/// ```json
/// {
///   "balance": 100
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalanceResponse {
    pub balance: i64,
}
