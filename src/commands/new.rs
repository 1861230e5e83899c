//! Create a new post

use anyhow::Result;
use std::fs;

use crate::Folio;

/// Create a new post markdown file from the front-matter scaffold
pub fn create_post(folio: &Folio, title: &str, slug: Option<&str>) -> Result<()> {
    let posts_dir = folio.content_dir.join("posts");
    fs::create_dir_all(&posts_dir)?;

    let slug = match slug {
        Some(s) => slug::slugify(s),
        None => slug::slugify(title),
    };
    let file_path = posts_dir.join(format!("{}.md", slug));

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let now = chrono::Local::now();
    let content = format!(
        r#"---
title: {}
date: {}
tags:
---

"#,
        title,
        now.format("%Y-%m-%d")
    );

    fs::write(&file_path, content)?;
    println!("Created: {:?}", file_path);

    Ok(())
}
