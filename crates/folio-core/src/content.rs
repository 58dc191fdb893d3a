//! Content types and structures.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{CoreError, Result},
    frontmatter::{PostMeta, ProjectMeta},
};

/// Average reading speed used for `time_to_read`, in words per minute.
pub const WORDS_PER_MINUTE: usize = 265;

/// Maximum excerpt length in characters (before the ellipsis).
pub const EXCERPT_LENGTH: usize = 140;

/// Top-level paths owned by generated listings and the frontend bundle.
/// A post slug may not start with one of these.
pub const RESERVED_SLUGS: &[&str] = &["blog", "categories", "project", "projects", "pkg"];

/// A blog post ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// URL slug without surrounding slashes (e.g., "stop-using-gifs").
    pub slug: String,

    /// Site-relative URL (e.g., "/stop-using-gifs/").
    pub url: String,

    /// Parsed frontmatter.
    pub meta: PostMeta,

    /// Rendered HTML body.
    pub html: String,

    /// Plain text body for excerpts and word counts.
    pub text: String,

    /// Source file path.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

/// A portfolio project ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// URL slug without surrounding slashes.
    pub slug: String,

    /// Site-relative URL (e.g., "/project/react-montreal/").
    pub url: String,

    /// Parsed frontmatter.
    pub meta: ProjectMeta,

    /// Rendered HTML body.
    pub html: String,

    /// Source file path.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Post {
    /// Assemble a post from its parts, deriving the slug when the
    /// frontmatter does not set one.
    pub fn new(meta: PostMeta, html: String, text: String, path: &Path) -> Self {
        let slug = meta
            .slug
            .as_deref()
            .map(normalize_slug)
            .unwrap_or_else(|| slug_from_path(path));
        let url = format!("/{slug}/");

        Self {
            slug,
            url,
            meta,
            html,
            text,
            source_path: Some(path.to_path_buf()),
        }
    }

    /// Post title.
    pub fn title(&self) -> &str {
        &self.meta.title
    }

    /// Reject slugs that leave the site root or shadow a generated listing.
    pub fn validate_slug(&self, path: &Path) -> Result<()> {
        check_slug(&self.slug, path)?;
        let first = self.slug.split('/').next().unwrap_or_default();
        if RESERVED_SLUGS.contains(&first) {
            return Err(CoreError::frontmatter(
                path,
                format!("slug \"{}\" collides with the reserved /{first}/ path", self.slug),
            ));
        }
        Ok(())
    }

    /// Publication date.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.meta.date
    }

    /// Human readable date, e.g. "March 10, 2019".
    pub fn formatted_date(&self) -> Option<String> {
        self.meta.date.map(|d| d.format("%B %d, %Y").to_string())
    }

    /// Machine readable date for `<time datetime>`, e.g. "2019-03-10".
    pub fn date_time_string(&self) -> Option<String> {
        self.meta.date.map(|d| d.format("%Y-%m-%d").to_string())
    }

    /// Number of words in the body.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Estimated reading time in minutes, never less than one.
    pub fn time_to_read(&self) -> usize {
        let words = self.word_count();
        let minutes = (words + WORDS_PER_MINUTE / 2) / WORDS_PER_MINUTE;
        minutes.max(1)
    }

    /// Plain text excerpt of the body.
    pub fn excerpt(&self) -> String {
        excerpt(&self.text, EXCERPT_LENGTH)
    }

    /// Description from frontmatter, falling back to the excerpt.
    pub fn summary(&self) -> String {
        self.meta
            .description
            .clone()
            .unwrap_or_else(|| self.excerpt())
    }
}

impl Project {
    /// Assemble a project from its parts.
    pub fn new(meta: ProjectMeta, html: String, path: &Path) -> Self {
        let slug = meta
            .slug
            .as_deref()
            .map(normalize_slug)
            .unwrap_or_else(|| slug_from_path(path));
        let url = format!("/project/{slug}/");

        Self {
            slug,
            url,
            meta,
            html,
            source_path: Some(path.to_path_buf()),
        }
    }

    /// Project title.
    pub fn title(&self) -> &str {
        &self.meta.title
    }

    /// Reject slugs that leave `/project/`.
    pub fn validate_slug(&self, path: &Path) -> Result<()> {
        check_slug(&self.slug, path)
    }
}

/// A slug must be non-empty and made of plain path segments.
fn check_slug(slug: &str, path: &Path) -> Result<()> {
    if slug.is_empty() {
        return Err(CoreError::frontmatter(path, "slug is empty"));
    }
    let bad_segment = slug
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if bad_segment || slug.contains('\\') {
        return Err(CoreError::frontmatter(
            path,
            format!("slug \"{slug}\" must not contain empty, `.` or `..` segments"),
        ));
    }
    Ok(())
}

/// Convert text to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' || c == '/' {
            pending_dash = true;
        }
    }

    slug
}

/// Trim slashes from a frontmatter slug.
fn normalize_slug(slug: &str) -> String {
    slug.trim_matches('/').to_string()
}

/// Derive a slug from a content file path.
///
/// `blog/stop-using-gifs/index.md` and `blog/stop-using-gifs.md` both
/// become `stop-using-gifs`.
fn slug_from_path(path: &Path) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();

    let name = if stem == "index" {
        path.parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or(stem)
    } else {
        stem
    };

    slugify(name)
}

/// Cut `text` to at most `max_chars` characters on a word boundary.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.chars().count() <= max_chars {
        return normalized;
    }

    let mut cut = String::new();
    for word in normalized.split(' ') {
        let extra = if cut.is_empty() { 0 } else { 1 };
        if cut.chars().count() + extra + word.chars().count() > max_chars {
            break;
        }
        if !cut.is_empty() {
            cut.push(' ');
        }
        cut.push_str(word);
    }

    if cut.is_empty() {
        cut = normalized.chars().take(max_chars).collect();
    }

    cut.push('…');
    cut
}
