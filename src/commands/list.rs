//! List site content

use anyhow::Result;
use std::collections::HashMap;

use crate::content::ContentLoader;
use crate::Folio;

/// List site content by type
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    let loader = ContentLoader::new(folio);

    match content_type {
        "post" | "posts" => {
            let posts = loader.load_posts()?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!("  {} - {} [{}]", post.date, post.title, post.slug);
            }
        }
        "tag" | "tags" => {
            let posts = loader.load_posts()?;
            let mut tags: HashMap<String, usize> = HashMap::new();
            for post in &posts {
                for tag in &post.tags {
                    *tags.entry(tag.clone()).or_insert(0) += 1;
                }
            }
            println!("Tags ({}):", tags.len());
            let mut tags: Vec<_> = tags.into_iter().collect();
            tags.sort_by(|a, b| b.1.cmp(&a.1));
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        "project" | "projects" => {
            let projects = loader.load_projects()?;
            println!("Projects ({}):", projects.len());
            for project in projects {
                println!("  {} - {}", project.name, project.description);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, project",
                content_type
            );
        }
    }

    Ok(())
}
