//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::redirect_service::RedirectService`] - Resolve, dedup, decide and record on every redirect
//! - [`services::link_service::LinkService`] - Token resolution and link administration
//! - [`services::counter_service::CounterService`] - Click recording, corrections and daily rollups
//! - [`services::auth_service::AuthService`] - Admin API token authentication
//! - [`services::account_service::AccountService`] - Isolated account provisioning

pub mod services;
