//! Post and Project models

use serde::{Deserialize, Serialize};

/// A blog post
///
/// Posts are loaded once from markdown files at startup and are read-only
/// afterwards. The date stays the authored calendar date string; ordering
/// and display parse it on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// URL-friendly identifier, unique across the collection
    pub slug: String,

    /// Post title
    pub title: String,

    /// Authored publication date string (like "2024-01-15")
    pub date: String,

    /// Short teaser shown in listings
    pub excerpt: String,

    /// Path to the header image asset, if any
    pub featured_image: Option<String>,

    /// Post tags
    pub tags: Vec<String>,

    /// Raw markdown content
    pub raw: String,

    /// Rendered HTML content
    pub content: String,

    /// Source file path (relative to the content directory)
    pub source: String,

    /// Whether the post is published
    pub published: bool,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(slug: String, title: String, date: String) -> Self {
        Self {
            slug,
            title,
            date,
            excerpt: String::new(),
            featured_image: None,
            tags: Vec::new(),
            raw: String::new(),
            content: String::new(),
            source: String::new(),
            published: true,
        }
    }

    /// Whether this post carries the given tag (case-sensitive exact match)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// A portfolio project entry from content/projects.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project name
    pub name: String,

    /// One-paragraph description
    pub description: String,

    /// Live URL, if deployed
    #[serde(default)]
    pub url: Option<String>,

    /// Source repository URL
    #[serde(default)]
    pub repo: Option<String>,

    /// Path to a screenshot or cover image
    #[serde(default)]
    pub image: Option<String>,

    /// Technologies used
    #[serde(default)]
    pub tech: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_tag_exact_match() {
        let mut post = Post::new("a".into(), "A".into(), "2024-01-01".into());
        post.tags = vec!["rust".to_string(), "Web".to_string()];
        assert!(post.has_tag("rust"));
        assert!(post.has_tag("Web"));
        assert!(!post.has_tag("web"));
        assert!(!post.has_tag("go"));
    }
}
