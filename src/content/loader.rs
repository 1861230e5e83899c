//! Content loader - reads posts and projects from the content directory

use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

use super::{FrontMatter, MarkdownRenderer, Post, Project};
use crate::Folio;

/// Content that fails collection-level invariants
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("duplicate slug '{slug}' in {first} and {second}")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },
}

/// Loads posts and projects from the content directory
pub struct ContentLoader<'a> {
    folio: &'a Folio,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(folio: &'a Folio) -> Self {
        Self {
            folio,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Load all posts from content/posts, newest first.
    ///
    /// Files that fail to parse are skipped with a warning; a duplicate slug
    /// across the collection is a hard error since slugs are the post URLs.
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let posts_dir = self.folio.content_dir.join("posts");
        if !posts_dir.exists() {
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(&posts_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && is_markdown_file(path) {
                match self.load_post(path) {
                    Ok(post) => {
                        if post.published {
                            posts.push(post);
                        } else {
                            tracing::debug!("Skipping unpublished post {:?}", path);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load post {:?}: {}", path, e);
                    }
                }
            }
        }

        self.check_unique_slugs(&posts)?;

        // Newest first is the default listing order
        posts = super::filter_posts(&posts, None, super::SortOrder::Newest);

        Ok(posts)
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path) -> Result<Post> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content)?;

        let title = fm.title.unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        });

        // Slug from front-matter override, otherwise the slugified filename
        let slug = fm.slug.unwrap_or_else(|| {
            slug::slugify(
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("untitled"),
            )
        });

        // The date stays a string; unparseable values only affect ordering
        let date = fm.date.unwrap_or_default();
        if !date.is_empty() && crate::helpers::parse_post_date(&date).is_none() {
            tracing::warn!("Post {:?} has unparseable date '{}'", path, date);
        }

        let source = path
            .strip_prefix(&self.folio.content_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        let (excerpt_md, full_md) = MarkdownRenderer::split_excerpt(body);
        let content_html = self.renderer.render(&full_md)?;
        let excerpt = fm.excerpt.or(excerpt_md).unwrap_or_default();

        let mut post = Post::new(slug, title, date);
        post.excerpt = excerpt;
        post.featured_image = fm.image;
        post.tags = fm.tags;
        post.raw = body.to_string();
        post.content = content_html;
        post.source = source;
        post.published = fm.published;

        Ok(post)
    }

    /// Load portfolio projects from content/projects.yml
    pub fn load_projects(&self) -> Result<Vec<Project>> {
        let path = self.folio.content_dir.join("projects.yml");
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)?;
        let projects: Vec<Project> = serde_yaml::from_str(&content)?;
        Ok(projects)
    }

    fn check_unique_slugs(&self, posts: &[Post]) -> Result<()> {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for post in posts {
            if let Some(first) = seen.insert(&post.slug, &post.source) {
                return Err(ContentError::DuplicateSlug {
                    slug: post.slug.clone(),
                    first: first.to_string(),
                    second: post.source.clone(),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    fn site_with_posts(posts: &[(&str, &str)]) -> (TempDir, Folio) {
        let dir = TempDir::new().unwrap();
        let posts_dir = dir.path().join("content/posts");
        fs::create_dir_all(&posts_dir).unwrap();
        for (name, body) in posts {
            fs::write(posts_dir.join(name), body).unwrap();
        }

        let folio = Folio {
            config: SiteConfig::default(),
            base_dir: dir.path().to_path_buf(),
            content_dir: dir.path().join("content"),
            static_dir: dir.path().join("static"),
        };
        (dir, folio)
    }

    #[test]
    fn test_load_posts_newest_first() {
        let (_dir, folio) = site_with_posts(&[
            ("old.md", "---\ntitle: Old\ndate: 2020-01-01\n---\nOld body"),
            ("new.md", "---\ntitle: New\ndate: 2024-01-01\n---\nNew body"),
        ]);

        let posts = ContentLoader::new(&folio).load_posts().unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].slug, "new");
        assert_eq!(posts[1].slug, "old");
        assert!(posts[0].content.contains("New body"));
    }

    #[test]
    fn test_unpublished_posts_skipped() {
        let (_dir, folio) = site_with_posts(&[
            ("a.md", "---\ntitle: A\ndate: 2024-01-01\n---\nA"),
            (
                "draft.md",
                "---\ntitle: Draft\ndate: 2024-02-01\npublished: false\n---\nWIP",
            ),
        ]);

        let posts = ContentLoader::new(&folio).load_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "a");
    }

    #[test]
    fn test_duplicate_slug_is_error() {
        let (_dir, folio) = site_with_posts(&[
            ("a.md", "---\ntitle: A\nslug: same\ndate: 2024-01-01\n---\nA"),
            ("b.md", "---\ntitle: B\nslug: same\ndate: 2024-02-01\n---\nB"),
        ]);

        let err = ContentLoader::new(&folio).load_posts().unwrap_err();
        assert!(err.to_string().contains("duplicate slug"));
    }

    #[test]
    fn test_excerpt_from_marker() {
        let (_dir, folio) = site_with_posts(&[(
            "a.md",
            "---\ntitle: A\ndate: 2024-01-01\n---\nTeaser.\n<!-- more -->\nRest.",
        )]);

        let posts = ContentLoader::new(&folio).load_posts().unwrap();
        assert_eq!(posts[0].excerpt, "Teaser.");
        assert!(posts[0].content.contains("Rest."));
    }

    #[test]
    fn test_missing_dirs_give_empty_collections() {
        let dir = TempDir::new().unwrap();
        let folio = Folio {
            config: SiteConfig::default(),
            base_dir: dir.path().to_path_buf(),
            content_dir: dir.path().join("content"),
            static_dir: dir.path().join("static"),
        };
        let loader = ContentLoader::new(&folio);
        assert!(loader.load_posts().unwrap().is_empty());
        assert!(loader.load_projects().unwrap().is_empty());
    }

    #[test]
    fn test_load_projects() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("content")).unwrap();
        fs::write(
            dir.path().join("content/projects.yml"),
            "- name: folio\n  description: This site\n  repo: https://example.com/folio\n  tech:\n    - Rust\n",
        )
        .unwrap();

        let folio = Folio {
            config: SiteConfig::default(),
            base_dir: dir.path().to_path_buf(),
            content_dir: dir.path().join("content"),
            static_dir: dir.path().join("static"),
        };
        let projects = ContentLoader::new(&folio).load_projects().unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "folio");
        assert_eq!(projects[0].tech, vec!["Rust"]);
        assert!(projects[0].url.is_none());
    }
}
