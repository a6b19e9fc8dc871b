//! Balance service - Core business logic for account balances.
//!
//! This service handles:
//! - Implicit account creation on first read
//! - Signed deposits
//! - Conditional debits for withdrawals
//!
//! # Consistency
//!
//! Every operation is a read followed by a write, with no transaction and no
//! row lock around the pair. Two concurrent operations on the same account can
//! interleave and the later write wins. Reads in `apply_delta` and
//! `conditional_debit` are permissive: a failed read counts as a zero balance.

use std::sync::Arc;

use crate::{error::AppError, store::BalanceStore};

/// Balance operations over an injected store handle.
#[derive(Clone)]
pub struct BalanceService {
    store: Arc<dyn BalanceStore>,
}

impl BalanceService {
    pub fn new(store: Arc<dyn BalanceStore>) -> Self {
        Self { store }
    }

    /// Read the balance, creating the account with a zero balance if absent.
    ///
    /// # Returns
    ///
    /// `(balance, created)`, where `created` is true when this call inserted the row.
    ///
    /// # Errors
    ///
    /// - `Database`: the read or the creating write failed
    pub async fn get_or_create(&self, user_id: i64) -> Result<(i64, bool), AppError> {
        if let Some(balance) = self.store.fetch_balance(user_id).await? {
            return Ok((balance, false));
        }

        tracing::info!(user_id, "no account record, creating it");
        self.store.upsert_balance(user_id, 0).await?;

        Ok((0, true))
    }

    /// Add a signed `delta` to the balance. No funds check.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest`: the new balance would overflow
    /// - `Database`: the write failed
    pub async fn apply_delta(&self, user_id: i64, delta: i64) -> Result<(), AppError> {
        let current = self.read_permissive(user_id).await;

        let updated = current.checked_add(delta).ok_or_else(|| {
            AppError::InvalidRequest(format!("balance overflow applying delta {delta}"))
        })?;

        self.store.upsert_balance(user_id, updated).await?;
        tracing::debug!(user_id, delta, balance = updated, "balance updated");

        Ok(())
    }

    /// Debit `amount` if the balance covers it.
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: the debit was written
    /// - `Ok(false)`: `amount` exceeds the balance, nothing was written
    ///
    /// # Errors
    ///
    /// - `InvalidRequest`: a negative `amount` would overflow the balance
    /// - `Database`: the debit write failed
    pub async fn conditional_debit(&self, user_id: i64, amount: i64) -> Result<bool, AppError> {
        let balance = self.read_permissive(user_id).await;

        if amount > balance {
            tracing::info!(user_id, amount, balance, "insufficient balance");
            return Ok(false);
        }

        // A negative amount credits the account and may overflow.
        let updated = balance.checked_sub(amount).ok_or_else(|| {
            AppError::InvalidRequest(format!("balance overflow debiting {amount}"))
        })?;
        self.store.upsert_balance(user_id, updated).await?;
        tracing::debug!(user_id, amount, balance = updated, "balance debited");

        Ok(true)
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.store.ping().await?;
        Ok(())
    }

    /// Current balance, with an absent row or a failed read counted as zero.
    async fn read_permissive(&self, user_id: i64) -> i64 {
        match self.store.fetch_balance(user_id).await {
            Ok(balance) => balance.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(user_id, error = %e, "failed to read balance, assuming 0");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{FailingBalanceStore, MemoryBalanceStore, PausingBalanceStore};

    fn service_with(store: Arc<MemoryBalanceStore>) -> BalanceService {
        BalanceService::new(store)
    }

    #[tokio::test]
    async fn get_or_create_creates_unseen_account() {
        let store = Arc::new(MemoryBalanceStore::default());
        let service = service_with(store.clone());

        assert_eq!(service.get_or_create(1).await.unwrap(), (0, true));
        assert_eq!(store.balance_of(1).await, Some(0));
        assert_eq!(service.get_or_create(1).await.unwrap(), (0, false));
    }

    #[tokio::test]
    async fn get_or_create_is_stable_without_mutation() {
        let store = Arc::new(MemoryBalanceStore::default());
        store.seed(5, 250).await;
        let service = service_with(store);

        let first = service.get_or_create(5).await.unwrap();
        let second = service.get_or_create(5).await.unwrap();
        assert_eq!(first, (250, false));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn get_or_create_surfaces_read_errors() {
        let store = Arc::new(FailingBalanceStore {
            fail_reads: true,
            ..Default::default()
        });
        let service = BalanceService::new(store);

        assert!(matches!(
            service.get_or_create(1).await,
            Err(AppError::Database(_))
        ));
    }

    #[tokio::test]
    async fn deposits_sum_up() {
        let store = Arc::new(MemoryBalanceStore::default());
        let service = service_with(store.clone());

        for delta in [100, -30, 45, 0, -200] {
            service.apply_delta(9, delta).await.unwrap();
        }

        assert_eq!(store.balance_of(9).await, Some(-85));
    }

    #[tokio::test]
    async fn deposit_overflow_is_rejected_without_write() {
        let store = Arc::new(MemoryBalanceStore::default());
        store.seed(3, i64::MAX).await;
        let service = service_with(store.clone());

        let result = service.apply_delta(3, 1).await;

        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
        assert_eq!(store.balance_of(3).await, Some(i64::MAX));
    }

    #[tokio::test]
    async fn deposit_after_failed_read_starts_from_zero() {
        let store = Arc::new(FailingBalanceStore {
            fail_reads: true,
            ..Default::default()
        });
        store.inner.seed(4, 500).await;
        let service = BalanceService::new(store.clone());

        service.apply_delta(4, 10).await.unwrap();

        assert_eq!(store.inner.balance_of(4).await, Some(10));
    }

    #[tokio::test]
    async fn debit_within_balance_is_applied() {
        let store = Arc::new(MemoryBalanceStore::default());
        store.seed(2, 100).await;
        let service = service_with(store.clone());

        assert!(service.conditional_debit(2, 30).await.unwrap());
        assert_eq!(store.balance_of(2).await, Some(70));

        assert!(service.conditional_debit(2, 70).await.unwrap());
        assert_eq!(store.balance_of(2).await, Some(0));
    }

    #[tokio::test]
    async fn debit_above_balance_is_refused() {
        let store = Arc::new(MemoryBalanceStore::default());
        store.seed(2, 100).await;
        let service = service_with(store.clone());

        assert!(!service.conditional_debit(2, 101).await.unwrap());
        assert_eq!(store.balance_of(2).await, Some(100));
    }

    #[tokio::test]
    async fn debit_after_failed_read_checks_against_zero() {
        let store = Arc::new(FailingBalanceStore {
            fail_reads: true,
            ..Default::default()
        });
        store.inner.seed(6, 1_000).await;
        let service = BalanceService::new(store.clone());

        assert!(!service.conditional_debit(6, 1).await.unwrap());
        assert_eq!(store.inner.balance_of(6).await, Some(1_000));
    }

    #[tokio::test]
    async fn debit_write_failure_is_an_error() {
        let store = Arc::new(FailingBalanceStore {
            fail_writes: true,
            ..Default::default()
        });
        store.inner.seed(8, 100).await;
        let service = BalanceService::new(store.clone());

        assert!(matches!(
            service.conditional_debit(8, 10).await,
            Err(AppError::Database(_))
        ));
        assert_eq!(store.inner.balance_of(8).await, Some(100));
    }

    #[tokio::test]
    async fn concurrent_deposits_lose_an_update() {
        let store = Arc::new(PausingBalanceStore::new(2));
        store.inner.seed(1, 100).await;
        let service = BalanceService::new(store.clone());

        let (a, b) = tokio::join!(service.apply_delta(1, 50), service.apply_delta(1, 20));
        a.unwrap();
        b.unwrap();

        let writes = store.writes().await;
        let mut sorted = writes.clone();
        sorted.sort();
        assert_eq!(sorted, vec![120, 150]);
        assert_eq!(store.inner.balance_of(1).await, writes.last().copied());
    }

    #[tokio::test]
    async fn concurrent_debits_can_overdraw() {
        let store = Arc::new(PausingBalanceStore::new(2));
        store.inner.seed(1, 100).await;
        let service = BalanceService::new(store.clone());

        let (a, b) = tokio::join!(
            service.conditional_debit(1, 60),
            service.conditional_debit(1, 60)
        );

        assert!(a.unwrap());
        assert!(b.unwrap());
        assert_eq!(store.writes().await, vec![40, 40]);
        assert_eq!(store.inner.balance_of(1).await, Some(40));
    }
}
