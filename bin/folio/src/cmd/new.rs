//! New command - scaffold a post or project

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use clap::ValueEnum;
use color_eyre::eyre::{Result, WrapErr, bail};
use folio_core::slugify;

use super::{SitePaths, load_config};

/// Kind of content to scaffold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ContentKind {
    /// Blog post bundle under `blog/<slug>/index.md`.
    Post,
    /// Portfolio project under `projects/<slug>.md`.
    Project,
}

/// Run the new command.
///
/// Writes a draft with frontmatter into the content directory of the site
/// described by `config_path`. Existing files are never overwritten.
pub fn run(config_path: &Path, title: &str, kind: ContentKind) -> Result<()> {
    tracing::info!(?config_path, title, ?kind, "Creating new content");

    let config = load_config(config_path)?;
    let paths = SitePaths::resolve(config_path, &config);
    let file_path = create(&paths.content, title, kind)?;

    tracing::info!(?file_path, "Created new content file");
    println!("Created: {}", file_path.display());

    Ok(())
}

/// Scaffold content under `content_dir` and return the new file's path.
pub fn create(content_dir: &Path, title: &str, kind: ContentKind) -> Result<PathBuf> {
    let slug = slugify(title);
    if slug.is_empty() {
        bail!("Title {title:?} does not produce a usable slug");
    }

    let (file_path, body) = match kind {
        ContentKind::Post => (
            content_dir.join("blog").join(&slug).join("index.md"),
            post_template(title),
        ),
        ContentKind::Project => (
            content_dir.join("projects").join(format!("{slug}.md")),
            project_template(title),
        ),
    };

    if file_path.exists() {
        bail!("{} already exists", file_path.display());
    }

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).wrap_err("Failed to create directories")?;
    }
    fs::write(&file_path, body).wrap_err("Failed to write file")?;

    Ok(file_path)
}

fn post_template(title: &str) -> String {
    let date = Utc::now().format("%Y-%m-%d");

    format!(
        r#"---
title: "{title}"
date: {date}
categories: []
draft: true
---

Write your post here.
"#,
        title = yaml_escape(title)
    )
}

fn project_template(title: &str) -> String {
    format!(
        r##"---
title: "{title}"
text_color: "#fff"
background_color: "#114fe6"
weight: 0
draft: true
---

Describe the project here.
"##,
        title = yaml_escape(title)
    )
}

/// Escape a value for a double-quoted YAML scalar.
fn yaml_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
