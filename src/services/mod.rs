//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.

pub mod balance_service;
pub mod callback_service;
pub mod withdrawal_service;
