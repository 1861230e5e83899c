//! Helper functions shared by the filter, templates, and CLI

pub mod date;

pub use date::{display_date, parse_post_date};
