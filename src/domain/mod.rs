//! Domain layer: entities, repository contracts and the pure click rules.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`conversion`] - Adaptive conversion decision
//! - [`dedup`] - Once-per-visitor-per-day click deduplication
//!
//! The domain layer has no dependency on infrastructure or HTTP. Repository
//! traits are implemented in `crate::infrastructure::persistence`.
//!
//! # Click Processing Flow
//!
//! 1. The redirect handler resolves the token through [`repositories::LinkRepository`]
//! 2. [`dedup::DedupGuard`] decides whether the click is countable
//! 3. [`conversion::should_convert`] decides whether it is also a conversion
//! 4. [`repositories::CounterRepository`] applies the increments atomically

pub mod conversion;
pub mod dedup;
pub mod entities;
pub mod repositories;
