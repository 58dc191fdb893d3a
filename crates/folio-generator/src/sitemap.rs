//! Sitemap generation.
//!
//! Generates an XML sitemap listing every page written by the build.

use chrono::{DateTime, Utc};
use folio_core::Config;
use tracing::debug;

/// Change frequency for sitemap entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl ChangeFreq {
    fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

/// A sitemap URL entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapUrl {
    /// Site-relative path, e.g. `/blog/`.
    pub path: String,

    /// Last modification date.
    pub lastmod: Option<DateTime<Utc>>,

    /// Change frequency.
    pub changefreq: ChangeFreq,

    /// Priority (0.0 to 1.0).
    pub priority: f32,
}

impl SitemapUrl {
    /// Entry with defaults picked from the path: the home page is
    /// daily/1.0, listings weekly/0.6, everything else yearly/0.5.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let (changefreq, priority) = if path == "/" {
            (ChangeFreq::Daily, 1.0)
        } else if path.starts_with("/blog/") || path.starts_with("/categories/") || path == "/projects/" {
            (ChangeFreq::Weekly, 0.6)
        } else {
            (ChangeFreq::Yearly, 0.5)
        };

        Self {
            path,
            lastmod: None,
            changefreq,
            priority,
        }
    }

    /// Entry for a dated post.
    pub fn post(path: impl Into<String>, date: Option<DateTime<Utc>>) -> Self {
        Self {
            path: path.into(),
            lastmod: date,
            changefreq: ChangeFreq::Monthly,
            priority: 0.8,
        }
    }
}

/// Sitemap generator.
#[derive(Debug)]
pub struct SitemapGenerator {
    config: Config,
}

impl SitemapGenerator {
    /// Create a new sitemap generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Generate sitemap XML.
    pub fn generate(&self, urls: &[SitemapUrl]) -> String {
        debug!(count = urls.len(), "generating sitemap");

        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
        xml.push('\n');

        for url in urls {
            xml.push_str(&self.url_to_xml(url));
        }

        xml.push_str("</urlset>\n");
        xml
    }

    fn url_to_xml(&self, url: &SitemapUrl) -> String {
        let mut xml = String::from("  <url>\n");
        xml.push_str(&format!(
            "    <loc>{}</loc>\n",
            escape_xml(&self.config.url_for(&url.path))
        ));

        if let Some(lastmod) = &url.lastmod {
            xml.push_str(&format!(
                "    <lastmod>{}</lastmod>\n",
                lastmod.format("%Y-%m-%d")
            ));
        }

        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            url.changefreq.as_str()
        ));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", url.priority));
        xml.push_str("  </url>\n");
        xml
    }
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
