//! Withdrawal protocol - the account side of the booking saga.
//!
//! # Flow
//!
//! 1. Received: the request has been parsed
//! 2. Balance checked: current balance read, a failed read counts as 0
//! 3. Debited or refused: refused when the sum exceeds the balance or the
//!    debit write fails
//! 4. Notified: the outcome is handed to the callback notifier, once, on
//!    every branch
//!
//! Nothing here retries, rolls back or persists intermediate state.

use crate::{
    error::AppError,
    models::withdrawal::{WithdrawalOutcome, WithdrawalRequest},
    services::{balance_service::BalanceService, callback_service::CallbackNotifier},
};

/// How a withdrawal ended before notification.
#[derive(Debug)]
pub enum WithdrawalDecision {
    Debited,
    /// The balance did not cover the sum.
    Refused,
    /// The debit could not be written.
    Failed,
}

impl WithdrawalDecision {
    pub fn is_debited(&self) -> bool {
        matches!(self, WithdrawalDecision::Debited)
    }
}

/// Run one withdrawal to completion and report its outcome.
///
/// # Returns
///
/// - `Ok(())`: the debit was applied
///
/// # Errors
///
/// - `WithdrawalRefused`: insufficient balance, or the debit could not be
///   written (the cause is logged here)
///
/// The callback is dispatched before this returns, whatever the result.
pub async fn process_withdrawal(
    balances: &BalanceService,
    notifier: &CallbackNotifier,
    request: WithdrawalRequest,
) -> Result<(), AppError> {
    tracing::debug!(
        book_id = request.book_id,
        user_id = request.user_id,
        amount = request.withdrawal_sum,
        "withdrawal received"
    );

    let decision = match balances
        .conditional_debit(request.user_id, request.withdrawal_sum)
        .await
    {
        Ok(true) => WithdrawalDecision::Debited,
        Ok(false) => WithdrawalDecision::Refused,
        Err(e) => {
            tracing::error!(
                book_id = request.book_id,
                user_id = request.user_id,
                error = %e,
                "failed to change balance"
            );
            WithdrawalDecision::Failed
        }
    };

    let outcome = WithdrawalOutcome::new(&request, decision.is_debited());
    tracing::info!(
        book_id = outcome.book_id,
        user_id = outcome.user_id,
        price = outcome.price,
        status = outcome.status,
        "withdrawal decided"
    );
    notifier.notify(outcome).await;

    match decision {
        WithdrawalDecision::Debited => Ok(()),
        WithdrawalDecision::Refused | WithdrawalDecision::Failed => {
            Err(AppError::WithdrawalRefused)
        }
    }
}
