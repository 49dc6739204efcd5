//! Repository trait for account administration.

use crate::domain::entities::{Account, AccountStatus, Role};
use crate::error::AppError;
use async_trait::async_trait;

/// Pooled access to provisioned accounts, keyed by normalized email.
///
/// Creating accounts is not part of this trait: provisioning runs on its own
/// dedicated connection through
/// [`crate::infrastructure::persistence::ProvisioningContext`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgAccountRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Lists accounts ordered by email, optionally limited to one role.
    async fn list(&self, role: Option<Role>) -> Result<Vec<Account>, AppError>;

    /// Sets the status of the account owning `email`.
    ///
    /// Returns `None` if no account has this email.
    async fn set_status(
        &self,
        email: &str,
        status: AccountStatus,
    ) -> Result<Option<Account>, AppError>;

    /// Deletes the account owning `email`, returning the removed record.
    async fn delete(&self, email: &str) -> Result<Option<Account>, AppError>;
}
