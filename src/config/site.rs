//! Site configuration (site.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::theme::DEFAULT_PALETTE;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,

    // Directory
    pub content_dir: String,
    pub static_dir: String,

    // Blog
    pub per_page: usize,

    // Profile section shown on the home page
    #[serde(default)]
    pub profile: ProfileConfig,

    // Avatar accent palette, cycled on click
    pub palette: Vec<String>,

    // Contact form
    #[serde(default)]
    pub contact: ContactConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "folio".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),

            url: "http://localhost:4000".to_string(),

            content_dir: "content".to_string(),
            static_dir: "static".to_string(),

            per_page: 10,

            profile: ProfileConfig::default(),
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            contact: ContactConfig::default(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Profile section configuration (bio, avatar, skills, links)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub bio: String,
    pub avatar: String,
    pub skills: Vec<String>,
    pub links: HashMap<String, String>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            bio: String::new(),
            avatar: "/avatar.png".to_string(),
            skills: Vec::new(),
            links: HashMap::new(),
        }
    }
}

/// Contact form configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    /// Directory where accepted submissions are written by the outbox sender
    pub outbox_dir: String,
    /// Address shown as the delivery target on the contact page
    pub to_address: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            outbox_dir: "outbox".to_string(),
            to_address: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "folio");
        assert_eq!(config.per_page, 10);
        assert!(!config.palette.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r##"
title: My Site
author: Test User
per_page: 5
palette:
  - "#ff0000"
  - "#00ff00"
profile:
  bio: Hello there
  skills:
    - Rust
    - TypeScript
"##;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Site");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.per_page, 5);
        assert_eq!(config.palette, vec!["#ff0000", "#00ff00"]);
        assert_eq!(config.profile.skills, vec!["Rust", "TypeScript"]);
        // Unspecified fields fall back to defaults
        assert_eq!(config.content_dir, "content");
    }
}
