//! Configuration module

mod site;

pub use site::{ContactConfig, ProfileConfig, SiteConfig};
