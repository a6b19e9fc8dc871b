//! Withdrawal request and outcome models.
//!
//! A withdrawal is one step of the booking saga: the order service asks for a
//! debit tied to a book order and later learns the result from the outcome
//! callback.

use serde::{Deserialize, Serialize};

/// Request body for `PUT /account/withdrawal`.
///
/// # JSON Example
///
/// ```json
/// {
///   "book_id": 1,
///   "user_id": 42,
///   "withdrawal_sum": 30
/// }
/// ```
///
/// Absent fields read as 0; only unparseable JSON or mistyped values are
/// rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawalRequest {
    /// Order in the external booking system this withdrawal belongs to
    #[serde(default)]
    pub book_id: i64,

    /// Account to debit
    #[serde(default)]
    pub user_id: i64,

    /// Amount to debit
    #[serde(default)]
    pub withdrawal_sum: i64,
}

/// Result of one withdrawal attempt, sent to the saga orchestrator.
///
/// # JSON Example
///
/// ```json
/// {
///   "book_id": 1,
///   "user_id": 42,
///   "price": 30,
///   "status": true
/// }
/// ```
///
/// `status` is true only when the debit was written. Never persisted locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WithdrawalOutcome {
    pub book_id: i64,
    pub user_id: i64,
    pub price: i64,
    pub status: bool,
}

impl WithdrawalOutcome {
    /// Outcome for `request` with the given debit result.
    pub fn new(request: &WithdrawalRequest, status: bool) -> Self {
        Self {
            book_id: request.book_id,
            user_id: request.user_id,
            price: request.withdrawal_sum,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_uses_callback_field_names() {
        let request = WithdrawalRequest {
            book_id: 1,
            user_id: 7,
            withdrawal_sum: 30,
        };
        let outcome = WithdrawalOutcome::new(&request, true);

        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"book_id": 1, "user_id": 7, "price": 30, "status": true})
        );
    }

    #[test]
    fn request_fills_missing_fields_with_zero() {
        let request =
            serde_json::from_str::<WithdrawalRequest>(r#"{"book_id": 1, "user_id": 7}"#).unwrap();
        assert_eq!(request.book_id, 1);
        assert_eq!(request.user_id, 7);
        assert_eq!(request.withdrawal_sum, 0);
    }

    #[test]
    fn request_rejects_mistyped_fields() {
        let result = serde_json::from_str::<WithdrawalRequest>(r#"{"withdrawal_sum": "30"}"#);
        assert!(result.is_err());
    }
}
