//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Tracking link records (create/read/update/delete)
//! - [`CounterRepository`] - Atomic click and correction increments, daily rollups
//! - [`AccountRepository`] - Listing, status changes and removal of accounts

pub mod account_repository;
pub mod counter_repository;
pub mod link_repository;

pub use account_repository::AccountRepository;
pub use counter_repository::CounterRepository;
pub use link_repository::LinkRepository;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
#[cfg(test)]
pub use counter_repository::MockCounterRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
