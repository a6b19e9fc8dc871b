//! Balance storage.
//!
//! `BalanceStore` is the only way the service touches persisted balances.
//! Each method is a single statement, so every call is individually consistent
//! but sequences of calls are not isolated from each other.

use async_trait::async_trait;

use crate::{db::DbPool, models::account::Account};

/// Durable mapping of user id to balance.
#[async_trait]
pub trait BalanceStore: Send + Sync {
    /// Current balance, or `None` if the account has never been written.
    async fn fetch_balance(&self, user_id: i64) -> Result<Option<i64>, sqlx::Error>;

    /// Insert the account or overwrite its balance.
    async fn upsert_balance(&self, user_id: i64, balance: i64) -> Result<(), sqlx::Error>;

    /// Cheap connectivity check for the health endpoint.
    async fn ping(&self) -> Result<(), sqlx::Error>;
}

/// PostgreSQL-backed store over the `account` table.
#[derive(Debug, Clone)]
pub struct PgBalanceStore {
    pool: DbPool,
}

impl PgBalanceStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BalanceStore for PgBalanceStore {
    async fn fetch_balance(&self, user_id: i64) -> Result<Option<i64>, sqlx::Error> {
        let account = sqlx::query_as::<_, Account>("SELECT id, balance FROM account WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account.map(|a| a.balance))
    }

    async fn upsert_balance(&self, user_id: i64, balance: i64) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO account (id, balance)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET balance = excluded.balance
            "#,
        )
        .bind(user_id)
        .bind(balance)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
