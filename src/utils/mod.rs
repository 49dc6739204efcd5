//! Utility functions shared by handlers, services and the admin CLI.
//!
//! - [`identifiers`] - Link identifier generation and alias validation
//! - [`visitor_clock`] - Visitor-local date and midnight computation

pub mod identifiers;
pub mod visitor_clock;
