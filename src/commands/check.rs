//! Validate site content

use anyhow::Result;

use crate::content::ContentLoader;
use crate::helpers::parse_post_date;
use crate::Folio;

/// Check the content directory for problems.
///
/// Loading already fails hard on duplicate slugs; this adds the soft checks
/// worth knowing about before publishing. Returns an error when any problem
/// is found so the command can gate a deployment.
pub fn run(folio: &Folio) -> Result<()> {
    let loader = ContentLoader::new(folio);
    let posts = loader.load_posts()?;
    let projects = loader.load_projects()?;

    let mut problems = Vec::new();

    for post in &posts {
        if post.date.is_empty() {
            problems.push(format!("post '{}' has no date", post.slug));
        } else if parse_post_date(&post.date).is_none() {
            problems.push(format!(
                "post '{}' has unparseable date '{}' (it will sort as oldest)",
                post.slug, post.date
            ));
        }
        if post.tags.is_empty() {
            problems.push(format!("post '{}' has no tags", post.slug));
        }
    }

    for project in &projects {
        if project.url.is_none() && project.repo.is_none() {
            problems.push(format!("project '{}' has no url or repo link", project.name));
        }
    }

    println!("Checked {} posts, {} projects.", posts.len(), projects.len());

    if problems.is_empty() {
        println!("No problems found.");
        Ok(())
    } else {
        for problem in &problems {
            println!("  warning: {}", problem);
        }
        anyhow::bail!("{} problem(s) found", problems.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;
    use tempfile::TempDir;

    fn folio_with_post(body: &str) -> (TempDir, Folio) {
        let dir = TempDir::new().unwrap();
        let posts_dir = dir.path().join("content/posts");
        fs::create_dir_all(&posts_dir).unwrap();
        fs::write(posts_dir.join("a.md"), body).unwrap();

        let folio = Folio {
            config: SiteConfig::default(),
            base_dir: dir.path().to_path_buf(),
            content_dir: dir.path().join("content"),
            static_dir: dir.path().join("static"),
        };
        (dir, folio)
    }

    #[test]
    fn test_clean_content_passes() {
        let (_dir, folio) =
            folio_with_post("---\ntitle: A\ndate: 2024-01-01\ntags: [rust]\n---\nBody");
        assert!(run(&folio).is_ok());
    }

    #[test]
    fn test_bad_date_reported() {
        let (_dir, folio) =
            folio_with_post("---\ntitle: A\ndate: someday\ntags: [rust]\n---\nBody");
        let err = run(&folio).unwrap_err();
        assert!(err.to_string().contains("problem"));
    }
}
