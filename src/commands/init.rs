//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("content/posts"))?;
    fs::create_dir_all(target_dir.join("static"))?;

    // Default site.yml
    let config_content = r#"# folio configuration

# Site
title: My Site
description: ''
author: John Doe
language: en

# URL
url: http://localhost:4000

# Directory
content_dir: content
static_dir: static

# Blog
per_page: 10

# Home page profile
profile:
  bio: A few lines about yourself.
  avatar: /avatar.png
  skills:
    - Rust
  links:
    GitHub: https://github.com/your-name

# Avatar accent palette, cycled on click
palette:
  - '#eca72c'
  - '#e4572e'
  - '#6b2d5c'
  - '#2a9d8f'
  - '#274690'

# Contact form
contact:
  outbox_dir: outbox
  to_address: you@example.com
"#;

    fs::write(target_dir.join("site.yml"), config_content)?;

    // Empty project list to fill in
    let projects = r#"# Portfolio projects shown on the home page
- name: folio
  description: This site.
  repo: https://github.com/your-name/folio
  tech:
    - Rust
"#;
    fs::write(target_dir.join("content/projects.yml"), projects)?;

    // A first post
    let now = chrono::Local::now();
    let sample_post = format!(
        r#"---
title: Hello World
date: {}
tags:
  - meta
---

Welcome to your new site. This paragraph is the excerpt shown in listings.

<!-- more -->

Everything after the marker only appears on the post page. Run
`folio serve --watch` and edit this file to see the page reload.
"#,
        now.format("%Y-%m-%d")
    );
    fs::write(target_dir.join("content/posts/hello-world.md"), sample_post)?;

    // Minimal stylesheet wired to the accent variable
    let stylesheet = r#"body {
  max-width: 46rem;
  margin: 0 auto;
  padding: 1rem;
  font-family: system-ui, sans-serif;
  line-height: 1.6;
}
a { color: var(--accent); }
.avatar {
  width: 8rem;
  border-radius: 50%;
  border: 4px solid var(--accent);
  cursor: pointer;
}
.tag { margin-right: 0.5rem; color: var(--accent); }
.notice { padding: 0.75rem; border-left: 4px solid var(--accent); }
.notice-error { border-color: #c0392b; }
.notice-warn { border-color: #e67e22; }
.nope { position: absolute; left: -9999px; }
"#;
    fs::write(target_dir.join("static/style.css"), stylesheet)?;

    Ok(())
}
