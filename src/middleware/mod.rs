//! HTTP middleware components.
//!
//! Middleware run before route handlers and can short-circuit requests
//! (e.g. reject unauthenticated ones).

/// `X-User-Id` authentication check and extractor
pub mod auth;
