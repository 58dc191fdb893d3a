//! Content collection and organization.
//!
//! Walks `blog/` and `projects/` under the content directory, parses every
//! markdown file and orders the results for rendering.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
};

use folio_core::{Config, Post, Project, slugify};
use folio_parser::MarkdownParser;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Sub-directory holding blog posts.
pub const BLOG_DIR: &str = "blog";

/// Sub-directory holding portfolio projects.
pub const PROJECTS_DIR: &str = "projects";

/// Content collection errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error.
    #[error("failed to walk content directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// A category and the posts filed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Name as written in frontmatter.
    pub name: String,

    /// URL slug.
    pub slug: String,

    /// Indexes into [`SiteContent::posts`], newest first.
    pub posts: Vec<usize>,
}

impl Category {
    /// Site-relative URL of the category page.
    pub fn url(&self) -> String {
        format!("/categories/{}/", self.slug)
    }
}

/// Collected site content.
#[derive(Debug, Default)]
pub struct SiteContent {
    /// Posts, newest first.
    pub posts: Vec<Post>,

    /// Projects by weight, then title.
    pub projects: Vec<Project>,

    /// Categories by slug.
    pub categories: BTreeMap<String, Category>,
}

impl SiteContent {
    /// Newer and older neighbors of the post at `index`.
    pub fn neighbors(&self, index: usize) -> (Option<&Post>, Option<&Post>) {
        let newer = index.checked_sub(1).and_then(|i| self.posts.get(i));
        let older = self.posts.get(index + 1);
        (newer, older)
    }

    /// Posts in a category, newest first.
    pub fn category_posts(&self, category: &Category) -> Vec<&Post> {
        category
            .posts
            .iter()
            .filter_map(|&i| self.posts.get(i))
            .collect()
    }

    fn index_categories(&mut self) {
        self.categories.clear();
        for (index, post) in self.posts.iter().enumerate() {
            let mut seen = BTreeSet::new();
            for name in &post.meta.categories {
                let slug = slugify(name);
                // `CSS` and `css` on one post file it once.
                if slug.is_empty() || !seen.insert(slug.clone()) {
                    continue;
                }
                self.categories
                    .entry(slug.clone())
                    .or_insert_with(|| Category {
                        name: name.clone(),
                        slug,
                        posts: Vec::new(),
                    })
                    .posts
                    .push(index);
            }
        }
    }
}

/// Parses posts and projects from the content directory.
#[derive(Debug)]
pub struct ContentCollector {
    parser: MarkdownParser,
    content_dir: PathBuf,
    drafts: bool,
}

impl ContentCollector {
    /// Create a collector for `content_dir` using the build settings of `config`.
    #[must_use]
    pub fn new(config: &Config, content_dir: impl Into<PathBuf>) -> Self {
        Self {
            parser: MarkdownParser::with_theme(&config.build.syntax_theme),
            content_dir: content_dir.into(),
            drafts: config.build.drafts,
        }
    }

    /// Collect and order all content.
    ///
    /// Files that fail to parse are logged and skipped.
    pub fn collect(&self) -> Result<SiteContent> {
        info!(dir = %self.content_dir.display(), "collecting content");

        let post_files = find_markdown_files(&self.content_dir.join(BLOG_DIR))?;
        let project_files = find_markdown_files(&self.content_dir.join(PROJECTS_DIR))?;
        info!(
            posts = post_files.len(),
            projects = project_files.len(),
            "found content files"
        );

        let mut posts: Vec<Post> = post_files
            .par_iter()
            .filter_map(|path| {
                let source = read_source(path)?;
                match self.parser.parse_post(&source, path) {
                    Ok(post) if post.meta.draft && !self.drafts => {
                        debug!(url = %post.url, "skipping draft");
                        None
                    }
                    Ok(post) => Some(post),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "failed to parse post");
                        None
                    }
                }
            })
            .collect();

        let mut projects: Vec<Project> = project_files
            .par_iter()
            .filter_map(|path| {
                let source = read_source(path)?;
                match self.parser.parse_project(&source, path) {
                    Ok(project) if project.meta.draft && !self.drafts => {
                        debug!(url = %project.url, "skipping draft");
                        None
                    }
                    Ok(project) => Some(project),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "failed to parse project");
                        None
                    }
                }
            })
            .collect();

        sort_posts(&mut posts);
        sort_projects(&mut projects);

        let mut content = SiteContent {
            posts,
            projects,
            categories: BTreeMap::new(),
        };
        content.index_categories();

        info!(
            posts = content.posts.len(),
            projects = content.projects.len(),
            categories = content.categories.len(),
            "content collection complete"
        );

        Ok(content)
    }
}

/// Find `.md` files under `dir`, skipping hidden entries. A missing
/// directory yields no files.
pub fn find_markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        debug!(dir = %dir.display(), "content directory missing");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()));

    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "md") {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|n| n.to_string_lossy().starts_with('.'))
}

fn read_source(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(source) => Some(source),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read file");
            None
        }
    }
}

/// Order posts newest first. Undated posts go last, sorted by title.
pub fn sort_posts(posts: &mut [Post]) {
    posts.sort_by(|a, b| match (b.date(), a.date()) {
        (Some(b_date), Some(a_date)) => b_date.cmp(&a_date).then_with(|| a.title().cmp(b.title())),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.title().cmp(b.title()),
    });
}

/// Order projects by weight, then title.
pub fn sort_projects(projects: &mut [Project]) {
    projects.sort_by(|a, b| {
        a.meta
            .weight
            .cmp(&b.meta.weight)
            .then_with(|| a.title().cmp(b.title()))
    });
}
