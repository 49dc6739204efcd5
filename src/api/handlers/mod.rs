//! HTTP request handlers.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod counters;
pub mod daily_stats;
pub mod health;
pub mod index;
pub mod links;
pub mod redirect;

pub use counters::adjust_counters_handler;
pub use daily_stats::daily_stats_handler;
pub use health::health_handler;
pub use index::index_handler;
pub use links::{
    create_link_handler, delete_link_handler, get_link_handler, list_links_handler,
    update_link_handler,
};
pub use redirect::redirect_handler;
