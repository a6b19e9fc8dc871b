//! Shared application state handed to every handler.

use crate::services::{balance_service::BalanceService, callback_service::CallbackNotifier};

#[derive(Clone)]
pub struct AppState {
    pub balances: BalanceService,
    pub notifier: CallbackNotifier,
}
