//! Site configuration management.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for Folio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide metadata.
    pub site: SiteConfig,

    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// RSS feed settings.
    #[serde(default)]
    pub rss: RssConfig,

    /// Color theme settings.
    #[serde(default)]
    pub theme: ThemeConfig,

    /// Web app manifest settings.
    #[serde(default)]
    pub manifest: ManifestConfig,

    /// Top navigation entries.
    #[serde(default = "default_menu")]
    pub menu: Vec<MenuEntry>,
}

/// Site metadata used for page titles, feeds and social cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,

    /// Public URL of the site (e.g., "https://example.com").
    pub url: String,

    /// Site author name.
    #[serde(default)]
    pub author: Option<String>,

    /// Site description for meta tags.
    #[serde(default)]
    pub description: Option<String>,

    /// Default social sharing image, relative to the site root.
    #[serde(default = "default_image_path")]
    pub image_path: String,

    /// Twitter handle for `twitter:site` cards (e.g., "@someone").
    #[serde(default)]
    pub twitter: Option<String>,

    /// Document language code.
    #[serde(default = "default_language")]
    pub language: String,
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Output directory for generated site.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Directory holding `blog/` and `projects/` content.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// Directory copied verbatim into the output.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Whether to generate drafts.
    #[serde(default)]
    pub drafts: bool,

    /// Number of posts per blog index page.
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: usize,

    /// Syntax highlighting theme name.
    #[serde(default = "default_syntax_theme")]
    pub syntax_theme: String,
}

/// RSS feed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RssConfig {
    /// Whether RSS feed is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of items in feed.
    #[serde(default = "default_rss_limit")]
    pub limit: usize,

    /// Feed file name inside the output directory.
    #[serde(default = "default_rss_filename")]
    pub filename: String,
}

/// Color theme configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Theme used until the visitor picks one ("light" or "dark").
    #[serde(default = "default_theme")]
    pub default: String,
}

/// Web app manifest configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// Application name; falls back to the site title.
    #[serde(default)]
    pub name: Option<String>,

    /// Short application name; falls back to the site title.
    #[serde(default)]
    pub short_name: Option<String>,

    /// Splash screen background color.
    #[serde(default = "default_background_color")]
    pub background_color: String,

    /// Browser UI theme color.
    #[serde(default = "default_theme_color")]
    pub theme_color: String,

    /// Icon path relative to the site root.
    #[serde(default)]
    pub icon: Option<String>,
}

/// A top navigation link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    /// Display label.
    pub label: String,

    /// Link target.
    pub url: String,
}

impl MenuEntry {
    /// Create a new menu entry.
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

// Default value functions
fn default_language() -> String {
    "en".to_string()
}

fn default_image_path() -> String {
    "/social-sharing.png".to_string()
}

fn default_output_dir() -> String {
    "public".to_string()
}

fn default_content_dir() -> String {
    "content".to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_posts_per_page() -> usize {
    10
}

fn default_syntax_theme() -> String {
    "base16-ocean.dark".to_string()
}

fn default_true() -> bool {
    true
}

fn default_rss_limit() -> usize {
    1000
}

fn default_rss_filename() -> String {
    "rss.xml".to_string()
}

fn default_theme() -> String {
    "dark".to_string()
}

fn default_background_color() -> String {
    "#fff".to_string()
}

fn default_theme_color() -> String {
    "#114fe6".to_string()
}

fn default_menu() -> Vec<MenuEntry> {
    vec![
        MenuEntry::new("projects", "/projects/"),
        MenuEntry::new("blog", "/blog/"),
    ]
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            content_dir: default_content_dir(),
            static_dir: default_static_dir(),
            drafts: false,
            posts_per_page: default_posts_per_page(),
            syntax_theme: default_syntax_theme(),
        }
    }
}

impl Default for RssConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            limit: default_rss_limit(),
            filename: default_rss_filename(),
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            default: default_theme(),
        }
    }
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            name: None,
            short_name: None,
            background_color: default_background_color(),
            theme_color: default_theme_color(),
            icon: None,
        }
    }
}

impl Config {
    /// Build a configuration with only the required site fields set.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            site: SiteConfig {
                title: title.into(),
                url: url.into(),
                author: None,
                description: None,
                image_path: default_image_path(),
                twitter: None,
                language: default_language(),
            },
            build: BuildConfig::default(),
            rss: RssConfig::default(),
            theme: ThemeConfig::default(),
            manifest: ManifestConfig::default(),
            menu: default_menu(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration, layering `FOLIO__SECTION__KEY` environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("FOLIO").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.site.title.is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        if self.site.url.is_empty() {
            return Err(CoreError::config("site.url cannot be empty"));
        }

        if self.build.posts_per_page == 0 {
            return Err(CoreError::config("build.posts_per_page must be at least 1"));
        }

        if !matches!(self.theme.default.as_str(), "light" | "dark") {
            return Err(CoreError::config(format!(
                "theme.default must be \"light\" or \"dark\", got \"{}\"",
                self.theme.default
            )));
        }

        if self.site.url.ends_with('/') {
            tracing::warn!("site.url should not have a trailing slash");
        }

        Ok(())
    }

    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.site.url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Name shown in the web app manifest.
    pub fn manifest_name(&self) -> &str {
        self.manifest.name.as_deref().unwrap_or(&self.site.title)
    }

    /// Short name shown in the web app manifest.
    pub fn manifest_short_name(&self) -> &str {
        self.manifest
            .short_name
            .as_deref()
            .unwrap_or(&self.site.title)
    }
}
