//! Data models for the account table and the API payloads.

/// Account balance model
pub mod account;
/// Withdrawal request and saga outcome
pub mod withdrawal;
