//! PostgreSQL implementation of account repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::rows::{AccountRow, account_columns};
use crate::domain::entities::{Account, AccountStatus, Role};
use crate::domain::repositories::AccountRepository;
use crate::error::AppError;

/// PostgreSQL repository for account records.
pub struct PgAccountRepository {
    pool: Arc<PgPool>,
}

impl PgAccountRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn list(&self, role: Option<Role>) -> Result<Vec<Account>, AppError> {
        let rows = sqlx::query_as::<_, AccountRow>(concat!(
            "SELECT ",
            account_columns!(),
            " FROM accounts WHERE ($1::text IS NULL OR role = $1) ORDER BY email"
        ))
        .bind(role.map(|r| r.as_str()))
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(Account::try_from).collect()
    }

    async fn set_status(
        &self,
        email: &str,
        status: AccountStatus,
    ) -> Result<Option<Account>, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(concat!(
            "UPDATE accounts SET status = $2, updated_at = NOW() WHERE email = $1 RETURNING ",
            account_columns!()
        ))
        .bind(email)
        .bind(status.as_str())
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Account::try_from).transpose()
    }

    async fn delete(&self, email: &str) -> Result<Option<Account>, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(concat!(
            "DELETE FROM accounts WHERE email = $1 RETURNING ",
            account_columns!()
        ))
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Account::try_from).transpose()
    }
}
