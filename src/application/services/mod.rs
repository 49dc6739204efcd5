//! Business logic services for the application layer.

pub mod account_service;
pub mod auth_service;
pub mod counter_service;
pub mod link_service;
pub mod redirect_service;

pub use account_service::AccountService;
pub use auth_service::AuthService;
pub use counter_service::CounterService;
pub use link_service::{CreateLink, LinkService, UpdateLink};
pub use redirect_service::{RedirectOutcome, RedirectService};
