//! Isolated store context for account provisioning.
//!
//! Provisioning opens its own dedicated connection instead of borrowing one
//! from a caller's pool, performs the write, and is torn down afterwards. The
//! caller's connections, transactions and session settings are never touched.

use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;

use super::rows::{AccountRow, account_columns};
use crate::domain::entities::{Account, NewAccount};
use crate::error::AppError;

/// A throwaway connection scoped to one provisioning operation.
pub struct ProvisioningContext {
    conn: PgConnection,
}

impl ProvisioningContext {
    /// Opens a fresh connection using `options`.
    pub async fn open(options: &PgConnectOptions) -> Result<Self, AppError> {
        let conn = PgConnection::connect_with(options).await?;
        Ok(Self { conn })
    }

    /// Creates the account, or updates name and role of the account that
    /// already owns this email. The `uid` of an existing account is kept and
    /// the account is (re)activated.
    pub async fn upsert_account(
        &mut self,
        uid: &str,
        account: &NewAccount,
    ) -> Result<Account, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(concat!(
            "INSERT INTO accounts (uid, email, name, role, status) \
             VALUES ($1, $2, $3, $4, 'active') \
             ON CONFLICT (email) DO UPDATE SET \
                name = EXCLUDED.name, role = EXCLUDED.role, status = 'active', \
                updated_at = NOW() \
             RETURNING ",
            account_columns!()
        ))
        .bind(uid)
        .bind(&account.email)
        .bind(&account.name)
        .bind(account.role.as_str())
        .fetch_one(&mut self.conn)
        .await?;

        row.try_into()
    }

    /// Closes the dedicated connection.
    pub async fn close(self) -> Result<(), AppError> {
        self.conn.close().await?;
        Ok(())
    }
}
