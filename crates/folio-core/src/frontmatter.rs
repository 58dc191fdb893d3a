//! Frontmatter parsing for content files.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};

use crate::error::{CoreError, Result};

/// Frontmatter metadata for blog posts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostMeta {
    /// Post title (required).
    pub title: String,

    /// Short description used on cards and meta tags.
    #[serde(default)]
    pub description: Option<String>,

    /// Publication date.
    #[serde(default, deserialize_with = "deserialize_date")]
    pub date: Option<DateTime<Utc>>,

    /// Explicit URL slug; derived from the file path when absent.
    #[serde(default)]
    pub slug: Option<String>,

    /// Categories for the post.
    #[serde(default)]
    pub categories: Vec<String>,

    /// Banner image path, also used as the social sharing image.
    #[serde(default)]
    pub banner: Option<String>,

    /// Whether this is a draft.
    #[serde(default)]
    pub draft: bool,
}

/// Frontmatter metadata for portfolio projects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectMeta {
    /// Project title (required).
    pub title: String,

    /// One-line subtitle shown under the title.
    #[serde(default)]
    pub subtitle: Option<String>,

    /// Longer description for cards and meta tags.
    #[serde(default)]
    pub description: Option<String>,

    /// Cover image path.
    #[serde(default)]
    pub image: Option<String>,

    /// Card text color.
    #[serde(default)]
    pub text_color: Option<String>,

    /// Card background color.
    #[serde(default)]
    pub background_color: Option<String>,

    /// Sort weight for ordering (lower first).
    #[serde(default)]
    pub weight: i32,

    /// Explicit URL slug; derived from the file path when absent.
    #[serde(default)]
    pub slug: Option<String>,

    /// Whether this is a draft.
    #[serde(default)]
    pub draft: bool,
}

/// Delimiter types for frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML frontmatter delimited by `---`.
    Yaml,
    /// TOML frontmatter delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Split content into frontmatter and body.
///
/// The closing delimiter only counts on a line of its own, so values may
/// contain `---` or `+++`.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.trim_start();

    let format = if content.starts_with("---") {
        FrontmatterFormat::Yaml
    } else if content.starts_with("+++") {
        FrontmatterFormat::Toml
    } else {
        return None;
    };

    let delimiter = format.delimiter();
    let after_first = &content[delimiter.len()..];

    // The first piece is the rest of the opening line.
    let mut offset = 0;
    for (index, line) in after_first.split_inclusive('\n').enumerate() {
        if index > 0 && line.trim_end() == delimiter {
            let frontmatter = after_first[..offset].trim();
            let body = after_first[offset + line.len()..].trim_start();
            return Some((format, frontmatter, body));
        }
        offset += line.len();
    }

    None
}

/// Parse frontmatter of any metadata type from a string.
///
/// Returns the metadata and the remaining body. Content without a
/// frontmatter block is an error because every post and project needs a title.
pub fn parse_frontmatter<T: DeserializeOwned>(content: &str, path: &Path) -> Result<(T, String)> {
    let Some((format, fm_str, body)) = split_frontmatter(content) else {
        return Err(CoreError::frontmatter(path, "missing frontmatter block"));
    };

    let meta: T = match format {
        FrontmatterFormat::Yaml => {
            serde_yaml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?
        }
        FrontmatterFormat::Toml => {
            toml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?
        }
    };

    Ok((meta, body.to_string()))
}

/// A date as written in frontmatter: YAML gives strings, TOML may give a
/// native datetime.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Text(String),
    Toml(toml::value::Datetime),
}

/// Accept RFC 3339 timestamps, `YYYY-MM-DD HH:MM:SS` and bare `YYYY-MM-DD` dates.
fn deserialize_date<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<RawDate>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(RawDate::Text(text)) => text,
        Some(RawDate::Toml(datetime)) => datetime.to_string(),
    };
    parse_date(&raw)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
}

/// Parse a frontmatter date string.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

impl PostMeta {
    /// Validate required fields.
    pub fn validate(&self, path: &Path) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(CoreError::frontmatter(path, "title is required"));
        }
        Ok(())
    }
}

impl ProjectMeta {
    /// Validate required fields.
    pub fn validate(&self, path: &Path) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(CoreError::frontmatter(path, "title is required"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;

    use super::*;

    #[test]
    fn test_split_yaml_frontmatter() {
        let content = r#"---
title: "Hello World"
date: 2024-01-14
---

This is the body content."#;

        let (format, fm, body) = split_frontmatter(content).expect("split");
        assert_eq!(format, FrontmatterFormat::Yaml);
        assert!(fm.contains("title:"));
        assert!(body.starts_with("This is the body"));
    }

    #[test]
    fn test_split_toml_frontmatter() {
        let content = r#"+++
title = "Hello World"
+++

This is the body content."#;

        let (format, fm, body) = split_frontmatter(content).expect("split");
        assert_eq!(format, FrontmatterFormat::Toml);
        assert!(fm.contains("title ="));
        assert!(body.starts_with("This is the body"));
    }

    #[test]
    fn test_no_frontmatter() {
        assert!(split_frontmatter("Just some content.").is_none());

        let result = parse_frontmatter::<PostMeta>("Just some content.", Path::new("a.md"));
        assert!(result.unwrap_err().to_string().contains("missing frontmatter"));
    }

    #[test]
    fn test_parse_post_meta() {
        let content = r#"---
title: "Grid does not replace flexbox"
description: "When to reach for which layout tool."
date: 2019-03-10
categories:
  - css
  - layout
banner: ./banner.png
---

Content here."#;

        let (meta, body): (PostMeta, String) =
            parse_frontmatter(content, Path::new("post.md")).expect("parse");

        assert_eq!(meta.title, "Grid does not replace flexbox");
        let date = meta.date.expect("date");
        assert_eq!((date.year(), date.month(), date.day()), (2019, 3, 10));
        assert_eq!(meta.categories, vec!["css", "layout"]);
        assert_eq!(meta.banner.as_deref(), Some("./banner.png"));
        assert!(!meta.draft);
        assert!(meta.slug.is_none());
        assert_eq!(body, "Content here.");
    }

    #[test]
    fn test_parse_toml_post_meta() {
        let content = r#"+++
title = "Test Post"
date = "2024-01-14T10:00:00Z"
draft = true
slug = "/custom-slug"
+++

Content here."#;

        let (meta, body): (PostMeta, String) =
            parse_frontmatter(content, Path::new("post.md")).expect("parse");

        assert_eq!(meta.title, "Test Post");
        assert!(meta.draft);
        assert_eq!(meta.slug.as_deref(), Some("/custom-slug"));
        assert!(meta.date.is_some());
        assert_eq!(body, "Content here.");
    }

    #[test]
    fn test_parse_native_toml_dates() {
        let content = "+++\ntitle = \"T\"\ndate = 2024-01-14\n+++\nbody";
        let (meta, body): (PostMeta, String) =
            parse_frontmatter(content, Path::new("post.md")).expect("parse");
        let date = meta.date.expect("date");
        assert_eq!((date.year(), date.month(), date.day()), (2024, 1, 14));
        assert_eq!(body, "body");

        for raw in ["2024-01-14T10:30:00Z", "2024-01-14T10:30:00", "2024-01-14T10:30:00+02:00"] {
            let content = format!("+++\ntitle = \"T\"\ndate = {raw}\n+++\n");
            let (meta, _): (PostMeta, String) =
                parse_frontmatter(&content, Path::new("post.md")).expect("parse");
            assert!(meta.date.is_some(), "{raw} should parse");
        }
    }

    #[test]
    fn test_delimiter_inside_value() {
        let content = "---\ntitle: \"Grid --- or flexbox\"\n---\nBody --- text\n";
        let (meta, body): (PostMeta, String) =
            parse_frontmatter(content, Path::new("post.md")).expect("parse");
        assert_eq!(meta.title, "Grid --- or flexbox");
        assert_eq!(body, "Body --- text\n");

        let toml = "+++\ntitle = \"a +++ b\"\n+++\n";
        let (meta, _): (PostMeta, String) =
            parse_frontmatter(toml, Path::new("post.md")).expect("parse");
        assert_eq!(meta.title, "a +++ b");
    }

    #[test]
    fn test_unclosed_frontmatter() {
        assert!(split_frontmatter("---\ntitle: x\n--- not a delimiter\n").is_none());
    }

    #[test]
    fn test_parse_project_meta() {
        let content = r##"---
title: "React Montreal"
subtitle: "Meetup website"
text_color: "#fff"
background_color: "#61dafb"
weight: 2
---
"##;

        let (meta, body): (ProjectMeta, String) =
            parse_frontmatter(content, Path::new("project.md")).expect("parse");

        assert_eq!(meta.title, "React Montreal");
        assert_eq!(meta.subtitle.as_deref(), Some("Meetup website"));
        assert_eq!(meta.text_color.as_deref(), Some("#fff"));
        assert_eq!(meta.background_color.as_deref(), Some("#61dafb"));
        assert_eq!(meta.weight, 2);
        assert!(body.is_empty());
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let content = "---\ntitle: x\ndate: next tuesday\n---\nbody";
        let result = parse_frontmatter::<PostMeta>(content, Path::new("bad.md"));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("bad.md"));
        assert!(err.contains("invalid date"));
    }

    #[test]
    fn test_parse_date_formats() {
        assert!(parse_date("2020-05-01").is_some());
        assert!(parse_date("2020-05-01 08:30:00").is_some());
        assert!(parse_date("2020-05-01T08:30:00+02:00").is_some());
        assert!(parse_date("May 1st").is_none());
    }

    #[test]
    fn test_validate_missing_title() {
        let meta = PostMeta::default();
        let result = meta.validate(Path::new("test.md"));
        assert!(result.unwrap_err().to_string().contains("title"));

        let project = ProjectMeta::default();
        assert!(project.validate(Path::new("p.md")).is_err());
    }
}
