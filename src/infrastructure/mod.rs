//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`cache`] - Alias cache (Redis and no-op implementations)
//! - [`persistence`] - PostgreSQL repositories and the provisioning context

pub mod cache;
pub mod persistence;
