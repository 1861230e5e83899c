//! Embedded site templates using the Tera template engine
//!
//! All page templates are compiled into the binary, so a site directory only
//! needs content and configuration.

use anyhow::Result;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::content::Post;
use crate::helpers::display_date;

/// Template renderer with embedded templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all site templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Autoescaping stays on: contact form values are echoed back into
        // the page. Post bodies from our own markdown pipeline are marked
        // safe where they are rendered.
        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("index.html", include_str!("site/index.html")),
            ("blog.html", include_str!("site/blog.html")),
            ("post.html", include_str!("site/post.html")),
            ("contact.html", include_str!("site/contact.html")),
            ("partials/post_card.html", include_str!("site/partials/post_card.html")),
        ])?;

        tera.register_filter("display_date", display_date_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);
        tera.register_filter("strip_html", strip_html_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: format a post date string for display
fn display_date_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("display_date", "value", String, value);
    Ok(tera::Value::String(display_date(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 160,
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!("{}…", truncated.trim_end())))
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    Ok(tera::Value::String(result))
}

/// Data structures for template context

/// A post prepared for listing or reading
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub excerpt: String,
    pub featured_image: Option<String>,
    pub tags: Vec<String>,
    pub content: String,
    pub url: String,
}

impl From<&Post> for PostView {
    fn from(post: &Post) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.title.clone(),
            date: post.date.clone(),
            excerpt: post.excerpt.clone(),
            featured_image: post.featured_image.clone(),
            tags: post.tags.clone(),
            content: post.content.clone(),
            url: format!("/blog/{}", post.slug),
        }
    }
}

/// A tag with its post count and filter link
#[derive(Debug, Clone, Serialize)]
pub struct TagView {
    pub name: String,
    pub count: usize,
    pub url: String,
}

impl TagView {
    pub fn new(name: &str, count: usize) -> Self {
        let encoded = utf8_percent_encode(name, NON_ALPHANUMERIC).to_string();
        Self {
            name: name.to_string(),
            count,
            url: format!("/blog?tag={}", encoded),
        }
    }
}

/// Collect tags with counts from a post collection, alphabetical
pub fn tag_views(posts: &[Post]) -> Vec<TagView> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for post in posts {
        for tag in &post.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let mut sorted: Vec<_> = counts.into_iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    sorted
        .into_iter()
        .map(|(name, count)| TagView::new(name, count))
        .collect()
}

/// Flash notice shown after a contact submission attempt
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    /// "success", "warn", or "error"
    pub level: String,
    pub text: String,
}

impl Notice {
    pub fn success(text: &str) -> Self {
        Self {
            level: "success".to_string(),
            text: text.to_string(),
        }
    }

    pub fn warn(text: &str) -> Self {
        Self {
            level: "warn".to_string(),
            text: text.to_string(),
        }
    }

    pub fn error(text: &str) -> Self {
        Self {
            level: "error".to_string(),
            text: text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_loads_templates() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_tag_views_sorted_with_counts() {
        let mut a = Post::new("a".into(), "A".into(), "2024-01-01".into());
        a.tags = vec!["rust".to_string(), "web".to_string()];
        let mut b = Post::new("b".into(), "B".into(), "2024-02-01".into());
        b.tags = vec!["rust".to_string()];

        let views = tag_views(&[a, b]);
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].name, "rust");
        assert_eq!(views[0].count, 2);
        assert_eq!(views[1].name, "web");
        assert_eq!(views[1].count, 1);
    }

    #[test]
    fn test_tag_view_url_is_encoded() {
        let view = TagView::new("systems programming", 1);
        assert_eq!(view.url, "/blog?tag=systems%20programming");
    }

    #[test]
    fn test_truncate_chars_filter() {
        let value = tera::Value::String("abcdef".to_string());
        let mut args = HashMap::new();
        args.insert("length".to_string(), tera::Value::from(4));
        let out = truncate_chars_filter(&value, &args).unwrap();
        assert_eq!(out, tera::Value::String("abcd…".to_string()));
    }

    #[test]
    fn test_strip_html_filter() {
        let value = tera::Value::String("<p>Hello <em>there</em></p>".to_string());
        let out = strip_html_filter(&value, &HashMap::new()).unwrap();
        assert_eq!(out, tera::Value::String("Hello there".to_string()));
    }
}
