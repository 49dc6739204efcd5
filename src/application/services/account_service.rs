//! Account provisioning and administration.
//!
//! Provisioning opens a [`ProvisioningContext`] of its own for every call and
//! tears it down afterwards, whether the upsert succeeded or not. Listing,
//! status changes and removal go through the pooled [`AccountRepository`].

use std::sync::Arc;

use serde_json::json;
use sqlx::postgres::PgConnectOptions;
use tracing::{info, warn};
use validator::ValidateEmail;

use crate::domain::entities::{Account, AccountStatus, NewAccount, Role};
use crate::domain::repositories::AccountRepository;
use crate::error::AppError;
use crate::infrastructure::persistence::ProvisioningContext;
use crate::utils::identifiers::generate_link_id;

/// Creates, lists, (de)activates and removes admin and affiliate accounts.
pub struct AccountService<R: AccountRepository> {
    options: PgConnectOptions,
    repository: Arc<R>,
}

impl<R: AccountRepository> AccountService<R> {
    /// `options` is used for the dedicated provisioning connection only.
    pub fn new(options: PgConnectOptions, repository: Arc<R>) -> Self {
        Self {
            options,
            repository,
        }
    }

    /// Creates the account, or updates name and role of the account that
    /// already owns `account.email`. Either way the account ends up active.
    /// Running it twice is harmless.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a malformed email or empty name
    /// and store errors from the provisioning connection.
    pub async fn provision(&self, account: NewAccount) -> Result<Account, AppError> {
        let account = normalize(account)?;
        let uid = generate_link_id()?;

        let mut context = ProvisioningContext::open(&self.options).await?;
        let result = context.upsert_account(&uid, &account).await;

        if let Err(e) = context.close().await {
            warn!(error = %e, "Failed to close provisioning connection");
        }

        let provisioned = result?;
        info!(
            uid = %provisioned.uid,
            email = %provisioned.email,
            role = %provisioned.role,
            "Account provisioned"
        );
        Ok(provisioned)
    }

    /// Lists accounts ordered by email, optionally only those with `role`.
    pub async fn list(&self, role: Option<Role>) -> Result<Vec<Account>, AppError> {
        self.repository.list(role).await
    }

    /// Activates or deactivates the account owning `email`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no account has this email.
    pub async fn set_status(
        &self,
        email: &str,
        status: AccountStatus,
    ) -> Result<Account, AppError> {
        let email = email.trim().to_lowercase();
        let account = self
            .repository
            .set_status(&email, status)
            .await?
            .ok_or_else(|| account_not_found(&email))?;

        info!(uid = %account.uid, email = %account.email, %status, "Account status changed");
        Ok(account)
    }

    /// Removes the account owning `email`. Links attributed to it are kept.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no account has this email.
    pub async fn delete(&self, email: &str) -> Result<Account, AppError> {
        let email = email.trim().to_lowercase();
        let account = self
            .repository
            .delete(&email)
            .await?
            .ok_or_else(|| account_not_found(&email))?;

        info!(uid = %account.uid, email = %account.email, "Account deleted");
        Ok(account)
    }
}

fn account_not_found(email: &str) -> AppError {
    AppError::not_found("Account not found", json!({ "email": email }))
}

fn normalize(account: NewAccount) -> Result<NewAccount, AppError> {
    let email = account.email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(AppError::bad_request(
            "Invalid email address",
            json!({ "field": "email" }),
        ));
    }

    let name = account.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::bad_request(
            "Name must not be empty",
            json!({ "field": "name" }),
        ));
    }

    Ok(NewAccount {
        email,
        name,
        role: account.role,
    })
}
