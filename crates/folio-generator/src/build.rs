//! Build orchestration.
//!
//! Coordinates the full site build process.

use std::{
    collections::BTreeMap,
    fs,
    path::{Component, Path, PathBuf},
    time::Instant,
};

use folio_core::{Config, Post};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    assets::{AssetCopier, AssetError},
    collector::{CollectorError, ContentCollector, SiteContent},
    html::{HtmlError, HtmlGenerator},
    manifest::ManifestGenerator,
    pagination::paginate,
    robots::RobotsGenerator,
    rss::RssGenerator,
    sitemap::{SitemapGenerator, SitemapUrl},
};

/// Base URL of the paginated blog index.
const BLOG_BASE: &str = "/blog/";

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Collector error.
    #[error("collector error: {0}")]
    Collector(#[from] CollectorError),

    /// HTML generation error.
    #[error("HTML error: {0}")]
    Html(#[from] HtmlError),

    /// Asset error.
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),

    /// Two pages would be written to the same file.
    #[error("{first} and {second} both render to {}", path.display())]
    OutputConflict {
        path: PathBuf,
        first: String,
        second: String,
    },

    /// A page URL resolves outside the output directory.
    #[error("{url} resolves outside the output directory")]
    OutsideOutput { url: String },
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Number of posts rendered.
    pub posts: usize,

    /// Number of projects rendered.
    pub projects: usize,

    /// Number of HTML files written, including listings and the 404 page.
    pub pages: usize,

    /// Number of category pages.
    pub categories: usize,

    /// Number of asset files copied.
    pub assets: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Site builder that orchestrates the build process.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    content_dir: PathBuf,
    output_dir: PathBuf,
    static_dir: Option<PathBuf>,
    livereload: bool,
}

impl Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new(config: Config, content_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            content_dir: content_dir.into(),
            output_dir: output_dir.into(),
            static_dir: None,
            livereload: false,
        }
    }

    /// Set the static assets directory.
    #[must_use]
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// Inject the live reload client into every page.
    #[must_use]
    pub fn with_livereload(mut self, enabled: bool) -> Self {
        self.livereload = enabled;
        self
    }

    /// Output directory of this builder.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Execute the full build process.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();
        let mut stats = BuildStats::default();
        let mut sitemap = Vec::new();

        info!(
            content = %self.content_dir.display(),
            output = %self.output_dir.display(),
            "starting build"
        );

        self.clean_output()?;

        let content = ContentCollector::new(&self.config, &self.content_dir).collect()?;
        let pagers = paginate(&content.posts, self.config.build.posts_per_page, BLOG_BASE);
        self.check_outputs(&content, pagers.iter().map(|pager| pager.url()))?;
        let html = HtmlGenerator::new(self.config.clone()).with_livereload(self.livereload);

        self.write_page("/", &html.render_home(&content)?)?;
        sitemap.push(SitemapUrl::new("/"));
        stats.pages += 1;

        stats.posts = self.generate_posts(&html, &content)?;
        stats.pages += stats.posts;
        sitemap.extend(
            content
                .posts
                .iter()
                .map(|post| SitemapUrl::post(&post.url, post.date())),
        );

        for pager in &pagers {
            let url = pager.url();
            self.write_page(&url, &html.render_blog_page(pager)?)?;
            sitemap.push(SitemapUrl::new(url));
            stats.pages += 1;
        }

        for category in content.categories.values() {
            let posts = content.category_posts(category);
            let url = category.url();
            self.write_page(&url, &html.render_category(category, &posts)?)?;
            sitemap.push(SitemapUrl::new(url));
            stats.categories += 1;
        }
        stats.pages += stats.categories;

        self.write_page("/projects/", &html.render_projects(&content.projects)?)?;
        sitemap.push(SitemapUrl::new("/projects/"));
        stats.pages += 1;

        for project in &content.projects {
            self.write_page(&project.url, &html.render_project(project)?)?;
            sitemap.push(SitemapUrl::new(&project.url));
        }
        stats.projects = content.projects.len();
        stats.pages += stats.projects;

        self.write_page("/404.html", &html.render_not_found()?)?;
        stats.pages += 1;

        if self.config.rss.enabled {
            self.generate_rss(&content.posts)?;
        }
        self.generate_sitemap(&sitemap)?;
        RobotsGenerator::new(self.config.clone()).write(&self.output_dir)?;
        ManifestGenerator::new(self.config.clone()).write(&self.output_dir)?;

        stats.assets = self.copy_assets(&content)?;
        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            posts = stats.posts,
            projects = stats.projects,
            pages = stats.pages,
            categories = stats.categories,
            assets = stats.assets,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    /// Clean the output directory.
    fn clean_output(&self) -> Result<()> {
        if self.output_dir.exists() {
            debug!(dir = %self.output_dir.display(), "cleaning output directory");
            fs::remove_dir_all(&self.output_dir)?;
        }
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Map every page to its output file before anything is written.
    fn check_outputs(&self, content: &SiteContent, pager_urls: impl Iterator<Item = String>) -> Result<()> {
        let mut pages: Vec<(String, String)> = vec![("/".to_string(), "home page".to_string())];
        pages.extend(content.posts.iter().map(|post| (post.url.clone(), page_source(&post.url, &post.source_path))));
        pages.extend(pager_urls.map(|url| (url.clone(), format!("blog index {url}"))));
        pages.extend(
            content
                .categories
                .values()
                .map(|category| (category.url(), format!("category {}", category.name))),
        );
        pages.push(("/projects/".to_string(), "projects index".to_string()));
        pages.extend(
            content
                .projects
                .iter()
                .map(|project| (project.url.clone(), page_source(&project.url, &project.source_path))),
        );
        pages.push(("/404.html".to_string(), "not found page".to_string()));

        let mut claimed: BTreeMap<PathBuf, String> = BTreeMap::new();
        for (url, source) in pages {
            let path = HtmlGenerator::output_path(&url, &self.output_dir);
            let relative = path.strip_prefix(&self.output_dir).unwrap_or(&path);
            if relative.components().any(|c| !matches!(c, Component::Normal(_))) {
                return Err(BuildError::OutsideOutput { url });
            }
            if let Some(first) = claimed.get(&path) {
                return Err(BuildError::OutputConflict {
                    path,
                    first: first.clone(),
                    second: source,
                });
            }
            claimed.insert(path, source);
        }

        Ok(())
    }

    /// Render every post with its neighbors in parallel.
    fn generate_posts(&self, html: &HtmlGenerator, content: &SiteContent) -> Result<usize> {
        info!(count = content.posts.len(), "generating posts");

        let results: Vec<_> = content
            .posts
            .par_iter()
            .enumerate()
            .map(|(index, post)| {
                let (newer, older) = content.neighbors(index);
                let page = html.render_post(post, newer, older)?;
                self.write_page(&post.url, &page)
            })
            .collect();

        let mut count = 0;
        for (result, post) in results.into_iter().zip(&content.posts) {
            match result {
                Ok(_) => count += 1,
                Err(e) => warn!(post = %post.url, error = %e, "failed to generate post"),
            }
        }

        Ok(count)
    }

    fn generate_rss(&self, posts: &[Post]) -> Result<()> {
        let xml = RssGenerator::new(self.config.clone()).generate(posts);
        let output_path = self.output_dir.join(&self.config.rss.filename);
        fs::write(&output_path, xml)?;

        info!(path = %output_path.display(), "generated RSS feed");
        Ok(())
    }

    fn generate_sitemap(&self, urls: &[SitemapUrl]) -> Result<()> {
        let xml = SitemapGenerator::new(self.config.clone()).generate(urls);
        let output_path = self.output_dir.join("sitemap.xml");
        fs::write(&output_path, xml)?;

        info!(path = %output_path.display(), urls = urls.len(), "generated sitemap");
        Ok(())
    }

    /// Copy the static directory and post bundles.
    fn copy_assets(&self, content: &SiteContent) -> Result<usize> {
        let copier = AssetCopier::new();
        let mut count = 0;

        if let Some(static_dir) = &self.static_dir {
            count += copier.copy_static(static_dir, &self.output_dir)?;
        }
        for post in &content.posts {
            count += copier.copy_post_bundle(post, &self.output_dir)?;
        }

        Ok(count)
    }

    fn write_page(&self, url: &str, html: &str) -> Result<PathBuf> {
        let output_path = HtmlGenerator::output_path(url, &self.output_dir);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, html)?;

        debug!(path = %output_path.display(), "wrote page");
        Ok(output_path)
    }
}

fn page_source(url: &str, source_path: &Option<PathBuf>) -> String {
    match source_path {
        Some(path) => path.display().to_string(),
        None => url.to_string(),
    }
}
