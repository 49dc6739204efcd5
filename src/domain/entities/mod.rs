//! Core domain entities.
//!
//! - [`TrackingLink`] - A tracking link with its conversion policy and counters
//! - [`DailyStat`] - Per-day click/conversion rollup
//! - [`CounterDelta`] - A change applied atomically to counters
//! - [`Account`] - An operator or affiliate profile
//!
//! Creation inputs (`NewLink`, `NewAccount`) and partial updates (`LinkPatch`)
//! are separate structs, so counters can never be set through them.

pub mod account;
pub mod counters;
pub mod daily_stat;
pub mod link;

pub use account::{Account, AccountStatus, NewAccount, Role};
pub use counters::CounterDelta;
pub use daily_stat::DailyStat;
pub use link::{LinkFilter, LinkPatch, NewLink, ResolvedLink, TrackingLink};
