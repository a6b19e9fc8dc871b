//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (headers, JSON body)
//! 2. Calls into the balance or withdrawal services
//! 3. Returns HTTP response (JSON, status code)

/// Account balance endpoints
pub mod accounts;
/// Liveness and database connectivity
pub mod health;
