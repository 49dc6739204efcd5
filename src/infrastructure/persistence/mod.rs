//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries. Rows are decoded into raw row structs and validated into domain
//! entities in [`rows`].
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Tracking link records
//! - [`PgCounterRepository`] - Atomic counter increments and daily rollups
//! - [`PgAccountRepository`] - Account listing, status and removal
//! - [`ProvisioningContext`] - Isolated connection for account provisioning

pub mod pg_account_repository;
pub mod pg_counter_repository;
pub mod pg_link_repository;
pub mod provisioning;
mod rows;

pub use pg_account_repository::PgAccountRepository;
pub use pg_counter_repository::PgCounterRepository;
pub use pg_link_repository::PgLinkRepository;
pub use provisioning::ProvisioningContext;
