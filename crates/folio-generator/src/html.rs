//! Page rendering.
//!
//! Every page is an inner template wrapped in the `base` shell, which
//! carries the SEO head, the menu and the footer. The interactive widgets
//! are mounted by the frontend into `#theme-switch` and
//! `#reading-progress`.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Utc};
use folio_core::{Config, Post, Project};
use thiserror::Error;
use tracing::debug;

use crate::{
    collector::{Category, SiteContent},
    pagination::{Pager, pagination_html},
    template::{TemplateContext, TemplateError, TemplateRegistry, escape_html},
};

/// Posts listed on the home page.
pub const HOME_POST_COUNT: usize = 5;

/// Endpoint the dev server streams reload events on.
pub const LIVERELOAD_PATH: &str = "/__livereload";

/// HTML generation errors.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
}

/// Result type for HTML generation.
pub type Result<T> = std::result::Result<T, HtmlError>;

/// Search and social metadata for one page.
///
/// The document title is the page title if set, else the frontmatter
/// title, else the site title. The description falls back to the site
/// description and the image to the site's default sharing image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seo {
    /// Title chosen by the page itself.
    pub page_title: Option<String>,

    /// Title from frontmatter.
    pub title: Option<String>,

    /// Description from frontmatter.
    pub description: Option<String>,

    /// Sharing image, site-relative or absolute.
    pub image: Option<String>,
}

impl Seo {
    /// Resolved document title.
    pub fn resolved_title<'a>(&'a self, site_title: &'a str) -> &'a str {
        self.page_title
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or(site_title)
    }
}

/// A rendered inner page waiting for the base shell.
struct Frame<'a> {
    path: &'a str,
    seo: Seo,
    content: String,
    reading_progress: bool,
}

/// HTML page generator.
#[derive(Debug)]
pub struct HtmlGenerator {
    templates: TemplateRegistry,
    config: Config,
    livereload: bool,
}

impl HtmlGenerator {
    /// Create a new HTML generator with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            templates: TemplateRegistry::new(),
            config,
            livereload: false,
        }
    }

    /// Inject the dev server's live reload script into every page.
    #[must_use]
    pub fn with_livereload(mut self, enabled: bool) -> Self {
        self.livereload = enabled;
        self
    }

    /// Meta tags for the `<head>`.
    pub fn seo_head(&self, seo: &Seo) -> String {
        let site = &self.config.site;
        let title = escape_html(seo.resolved_title(&site.title));
        let description = escape_html(
            seo.description
                .as_deref()
                .or(site.description.as_deref())
                .unwrap_or_default(),
        );
        let image = escape_html(&self.absolute_url(seo.image.as_deref().unwrap_or(&site.image_path)));

        let mut tags = vec![
            format!(r#"<meta name="description" content="{description}">"#),
            r#"<meta name="twitter:card" content="summary_large_image">"#.to_string(),
        ];
        if let Some(handle) = &site.twitter {
            tags.push(format!(
                r#"<meta name="twitter:site" content="{}">"#,
                escape_html(handle)
            ));
        }
        tags.push(format!(r#"<meta property="og:title" content="{title}">"#));
        tags.push(format!(r#"<meta property="og:image" content="{image}">"#));
        tags.push(format!(
            r#"<meta property="og:description" content="{description}">"#
        ));

        tags.join("\n    ")
    }

    /// Render the home page.
    pub fn render_home(&self, content: &SiteContent) -> Result<String> {
        let posts = content
            .posts
            .iter()
            .take(HOME_POST_COUNT)
            .map(post_card)
            .collect::<Vec<_>>()
            .join("\n");
        let projects = content
            .projects
            .iter()
            .map(project_card)
            .collect::<Vec<_>>()
            .join("\n");

        let ctx = TemplateContext::new()
            .with_var("description", escape_html(self.site_description()))
            .with_var("posts", posts)
            .with_var("projects", projects);
        let inner = self.templates.render("home", &ctx)?;

        self.wrap(Frame {
            path: "/",
            seo: Seo::default(),
            content: inner,
            reading_progress: false,
        })
    }

    /// Render a blog post with links to its newer and older neighbors.
    pub fn render_post(&self, post: &Post, newer: Option<&Post>, older: Option<&Post>) -> Result<String> {
        debug!(url = %post.url, "rendering post");

        let banner = post.meta.banner.as_deref().map(|b| banner_path(post, b));

        let mut ctx = TemplateContext::new()
            .with_var("title", escape_html(post.title()))
            .with_var("time_to_read", post.time_to_read().to_string())
            .with_var("content", &post.html)
            .with_opt("date_iso", post.date_time_string())
            .with_opt("date_formatted", post.formatted_date())
            .with_opt("categories", categories_html(&post.meta.categories))
            .with_opt("post_nav", post_nav_html(newer, older));

        if let Some(src) = &banner {
            ctx.insert(
                "banner",
                format!(
                    r#"<img class="banner" src="{}" alt="">"#,
                    escape_html(src)
                ),
            );
        }

        let inner = self.templates.render("post", &ctx)?;

        self.wrap(Frame {
            path: &post.url,
            seo: Seo {
                page_title: None,
                title: Some(post.title().to_string()),
                description: Some(post.summary()),
                image: banner,
            },
            content: inner,
            reading_progress: true,
        })
    }

    /// Render one page of the blog index.
    pub fn render_blog_page(&self, pager: &Pager<'_, Post>) -> Result<String> {
        let items = pager
            .items
            .iter()
            .map(post_card)
            .collect::<Vec<_>>()
            .join("\n");

        let ctx = TemplateContext::new()
            .with_var("description", "I write about web development.")
            .with_var("items", items)
            .with_opt("pagination", pagination_html(pager));
        let inner = self.templates.render("list", &ctx)?;

        let page_title = if pager.is_first() {
            format!("{} | Blog", self.config.site.title)
        } else {
            format!("{} | Blog | Page {}", self.config.site.title, pager.number)
        };

        let url = pager.url();
        self.wrap(Frame {
            path: &url,
            seo: Seo {
                page_title: Some(page_title),
                ..Seo::default()
            },
            content: inner,
            reading_progress: false,
        })
    }

    /// Render the listing for one category.
    pub fn render_category(&self, category: &Category, posts: &[&Post]) -> Result<String> {
        let items = posts
            .iter()
            .map(|post| post_card(post))
            .collect::<Vec<_>>()
            .join("\n");

        let ctx = TemplateContext::new()
            .with_var("category", escape_html(&category.name))
            .with_var("items", items);
        let inner = self.templates.render("category", &ctx)?;

        let url = category.url();
        self.wrap(Frame {
            path: &url,
            seo: Seo {
                page_title: Some(format!("{} | {}", self.config.site.title, category.name)),
                ..Seo::default()
            },
            content: inner,
            reading_progress: false,
        })
    }

    /// Render the project overview.
    pub fn render_projects(&self, projects: &[Project]) -> Result<String> {
        let items = projects
            .iter()
            .map(project_card)
            .collect::<Vec<_>>()
            .join("\n");

        let ctx = TemplateContext::new().with_var("items", items);
        let inner = self.templates.render("projects", &ctx)?;

        self.wrap(Frame {
            path: "/projects/",
            seo: Seo {
                page_title: Some(format!("{} | Projects", self.config.site.title)),
                ..Seo::default()
            },
            content: inner,
            reading_progress: false,
        })
    }

    /// Render a single project page.
    pub fn render_project(&self, project: &Project) -> Result<String> {
        debug!(url = %project.url, "rendering project");

        let ctx = TemplateContext::new()
            .with_var("title", escape_html(project.title()))
            .with_var("content", &project.html)
            .with_opt("subtitle", project.meta.subtitle.as_deref().map(escape_html))
            .with_opt("hero_style", card_style(&project.meta));
        let inner = self.templates.render("project", &ctx)?;

        self.wrap(Frame {
            path: &project.url,
            seo: Seo {
                page_title: None,
                title: Some(project.title().to_string()),
                description: project
                    .meta
                    .description
                    .clone()
                    .or_else(|| project.meta.subtitle.clone()),
                image: project.meta.image.clone(),
            },
            content: inner,
            reading_progress: false,
        })
    }

    /// Render the 404 page.
    pub fn render_not_found(&self) -> Result<String> {
        let inner = self.templates.render("not_found", &TemplateContext::new())?;

        self.wrap(Frame {
            path: "/404.html",
            seo: Seo {
                page_title: Some(format!("{} | Not Found", self.config.site.title)),
                ..Seo::default()
            },
            content: inner,
            reading_progress: false,
        })
    }

    /// Output file for a site-relative URL.
    #[must_use]
    pub fn output_path(url: &str, output_dir: &Path) -> PathBuf {
        let relative = url.trim_matches('/');

        if relative.is_empty() {
            output_dir.join("index.html")
        } else if relative.ends_with(".html") {
            output_dir.join(relative)
        } else {
            output_dir.join(relative).join("index.html")
        }
    }

    fn site_description(&self) -> &str {
        self.config.site.description.as_deref().unwrap_or_default()
    }

    fn absolute_url(&self, path: &str) -> String {
        if path.contains("://") {
            path.to_string()
        } else {
            self.config.url_for(path)
        }
    }

    fn wrap(&self, frame: Frame<'_>) -> Result<String> {
        let site = &self.config.site;
        let is_home = frame.path == "/";

        let home_link = format!(r#"<a href="/">{}</a>"#, escape_html(&site.title));
        let menu_title = if is_home {
            format!(r#"<h1 class="menu-title">{home_link}</h1>"#)
        } else {
            format!(r#"<span class="menu-title">{home_link}</span>"#)
        };

        let menu = self
            .config
            .menu
            .iter()
            .map(|entry| {
                let current = frame.path.starts_with(&entry.url) && entry.url != "/";
                format!(
                    r#"<li><a href="{}"{}>{}</a></li>"#,
                    escape_html(&entry.url),
                    if current { r#" aria-current="page""# } else { "" },
                    escape_html(&entry.label)
                )
            })
            .collect::<Vec<_>>()
            .join("\n                    ");

        let feed = self.config.rss.enabled.then(|| format!("/{}", self.config.rss.filename));

        let ctx = TemplateContext::new()
            .with_var("lang", escape_html(&site.language))
            .with_var("theme", escape_html(&self.config.theme.default))
            .with_var("title", escape_html(frame.seo.resolved_title(&site.title)))
            .with_var("seo", self.seo_head(&frame.seo))
            .with_var("canonical_url", escape_html(&self.config.url_for(frame.path)))
            .with_var("theme_color", escape_html(&self.config.manifest.theme_color))
            .with_opt(
                "feed_link",
                feed.as_ref().map(|href| {
                    format!(
                        r#"<link rel="alternate" type="application/rss+xml" title="{}" href="{href}">"#,
                        escape_html(&site.title)
                    )
                }),
            )
            .with_opt(
                "feed_footer",
                feed.as_ref()
                    .map(|href| format!(r#" &middot; <a href="{href}">RSS</a>"#)),
            )
            .with_opt(
                "livereload",
                self.livereload.then(|| {
                    format!(
                        r#"<script>new EventSource("{LIVERELOAD_PATH}").onmessage = () => location.reload();</script>"#
                    )
                }),
            )
            .with_opt(
                "reading_progress",
                frame
                    .reading_progress
                    .then_some(r#"<div id="reading-progress"></div>"#),
            )
            .with_var("menu_title", menu_title)
            .with_var("menu", menu)
            .with_var("content", frame.content)
            .with_var("year", Utc::now().year().to_string())
            .with_var(
                "author",
                escape_html(site.author.as_deref().unwrap_or(&site.title)),
            );

        Ok(self.templates.render("base", &ctx)?)
    }
}

/// Resolve a post banner to a site-relative path.
///
/// `./banner.png` and `banner.png` live next to the post and are copied
/// under its URL. Absolute paths and URLs are kept.
fn banner_path(post: &Post, banner: &str) -> String {
    if banner.starts_with('/') || banner.contains("://") {
        return banner.to_string();
    }
    format!("{}{}", post.url, banner.trim_start_matches("./"))
}

/// Summary card for post listings.
pub fn post_card(post: &Post) -> String {
    let date = match (post.date_time_string(), post.formatted_date()) {
        (Some(iso), Some(human)) => format!(r#"<time datetime="{iso}">{human}</time> &middot; "#),
        _ => String::new(),
    };

    format!(
        r#"<li class="post-card">
    <a href="{url}"><h3>{title}</h3></a>
    <p class="post-meta">{date}{minutes} min read</p>
    <p>{summary}</p>
</li>"#,
        url = escape_html(&post.url),
        title = escape_html(post.title()),
        minutes = post.time_to_read(),
        summary = escape_html(&post.summary()),
    )
}

/// Colored card for project listings.
pub fn project_card(project: &Project) -> String {
    let style = card_style(&project.meta)
        .map(|s| format!(r#" style="{s}""#))
        .unwrap_or_default();
    let image = project
        .meta
        .image
        .as_deref()
        .map(|src| format!(r#"<img src="{}" alt="">"#, escape_html(src)))
        .unwrap_or_default();
    let subtitle = project
        .meta
        .subtitle
        .as_deref()
        .map(|s| format!("<p>{}</p>", escape_html(s)))
        .unwrap_or_default();

    format!(
        r#"<a class="project-card" href="{url}"{style}>{image}<h3>{title}</h3>{subtitle}</a>"#,
        url = escape_html(&project.url),
        title = escape_html(project.title()),
    )
}

fn card_style(meta: &folio_core::ProjectMeta) -> Option<String> {
    let mut rules = Vec::new();
    if let Some(color) = &meta.text_color {
        rules.push(format!("color: {}", escape_html(color)));
    }
    if let Some(color) = &meta.background_color {
        rules.push(format!("background-color: {}", escape_html(color)));
    }
    (!rules.is_empty()).then(|| rules.join("; "))
}

fn categories_html(categories: &[String]) -> Option<String> {
    let links: Vec<_> = categories
        .iter()
        .filter_map(|name| {
            let slug = folio_core::slugify(name);
            (!slug.is_empty()).then(|| {
                format!(
                    r#"<li><a href="/categories/{slug}/">{}</a></li>"#,
                    escape_html(name)
                )
            })
        })
        .collect();

    if links.is_empty() {
        return None;
    }
    Some(format!(
        r#"<div class="categories"><span>Categories:</span><ul>{}</ul></div>"#,
        links.concat()
    ))
}

fn post_nav_html(newer: Option<&Post>, older: Option<&Post>) -> Option<String> {
    if newer.is_none() && older.is_none() {
        return None;
    }

    let mut html = String::from(r#"<nav class="post-nav">"#);
    if let Some(post) = newer {
        html.push_str(&format!(
            r#"<span class="post-nav-next">Next: <a href="{}">{}</a></span>"#,
            escape_html(&post.url),
            escape_html(post.title())
        ));
    }
    if let Some(post) = older {
        html.push_str(&format!(
            r#"<span class="post-nav-previous">Previous: <a href="{}">{}</a></span>"#,
            escape_html(&post.url),
            escape_html(post.title())
        ));
    }
    html.push_str("</nav>");
    Some(html)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use folio_core::{PostMeta, ProjectMeta};

    use super::*;
    use crate::pagination::paginate;

    fn config() -> Config {
        let mut config = Config::new("Robert Cooper", "https://example.com");
        config.site.description = Some("A web developer.".to_string());
        config.site.twitter = Some("@someone".to_string());
        config
    }

    fn post(title: &str, slug: &str) -> Post {
        let meta = PostMeta {
            title: title.to_string(),
            date: Some(Utc.with_ymd_and_hms(2019, 3, 10, 0, 0, 0).unwrap()),
            categories: vec!["CSS".to_string()],
            ..Default::default()
        };
        Post::new(
            meta,
            "<p>Body</p>".to_string(),
            "Body".to_string(),
            Path::new(&format!("blog/{slug}.md")),
        )
    }

    #[test]
    fn test_seo_title_precedence() {
        let mut seo = Seo::default();
        assert_eq!(seo.resolved_title("Site"), "Site");

        seo.title = Some("Front".to_string());
        assert_eq!(seo.resolved_title("Site"), "Front");

        seo.page_title = Some("Page".to_string());
        assert_eq!(seo.resolved_title("Site"), "Page");
    }

    #[test]
    fn test_seo_head_defaults() {
        let generator = HtmlGenerator::new(config());
        let head = generator.seo_head(&Seo::default());

        assert!(head.contains(r#"<meta name="description" content="A web developer.">"#));
        assert!(head.contains(r#"<meta name="twitter:card" content="summary_large_image">"#));
        assert!(head.contains(r#"<meta name="twitter:site" content="@someone">"#));
        assert!(head.contains(r#"<meta property="og:title" content="Robert Cooper">"#));
        assert!(head.contains(
            r#"<meta property="og:image" content="https://example.com/social-sharing.png">"#
        ));
    }

    #[test]
    fn test_seo_head_without_twitter() {
        let mut config = config();
        config.site.twitter = None;
        let head = HtmlGenerator::new(config).seo_head(&Seo::default());
        assert!(!head.contains("twitter:site"));
    }

    #[test]
    fn test_home_has_h1_title() {
        let generator = HtmlGenerator::new(config());
        let html = generator.render_home(&SiteContent::default()).unwrap();

        assert!(html.contains(r#"<h1 class="menu-title"><a href="/">Robert Cooper</a></h1>"#));
        assert!(html.contains(r#"<div id="theme-switch"></div>"#));
        assert!(!html.contains("reading-progress"));
    }

    #[test]
    fn test_post_page() {
        let generator = HtmlGenerator::new(config());
        let current = post("Grid & Flexbox", "grid");
        let newer = post("Newer One", "newer");
        let html = generator
            .render_post(&current, Some(&newer), None)
            .unwrap();

        assert!(html.contains("<title>Grid &amp; Flexbox</title>"));
        assert!(html.contains(r#"<span class="menu-title">"#));
        assert!(!html.contains(r#"<h1 class="menu-title">"#));
        assert!(html.contains(r#"<div id="reading-progress"></div>"#));
        assert!(html.contains(r#"<time datetime="2019-03-10">March 10, 2019</time>"#));
        assert!(html.contains(r#"<a href="/categories/css/">CSS</a>"#));
        assert!(html.contains(r#"Next: <a href="/newer/">Newer One</a>"#));
        assert!(!html.contains("Previous:"));
        assert!(html.contains(r#"<link rel="canonical" href="https://example.com/grid/">"#));
        assert!(html.contains(r#"<meta property="og:description" content="Body">"#));
    }

    #[test]
    fn test_post_banner_is_social_image() {
        let generator = HtmlGenerator::new(config());
        let mut current = post("Banner", "banner-post");
        current.meta.banner = Some("./banner.png".to_string());
        let html = generator.render_post(&current, None, None).unwrap();

        assert!(html.contains(r#"<img class="banner" src="/banner-post/banner.png" alt="">"#));
        assert!(html.contains(
            r#"<meta property="og:image" content="https://example.com/banner-post/banner.png">"#
        ));
        assert!(!html.contains("post-nav"));
    }

    #[test]
    fn test_blog_page_title_and_pagination() {
        let generator = HtmlGenerator::new(config());
        let posts: Vec<Post> = (0..3).map(|i| post(&format!("Post {i}"), &format!("p{i}"))).collect();
        let pages = paginate(&posts, 2, "/blog/");

        let first = generator.render_blog_page(&pages[0]).unwrap();
        assert!(first.contains("<title>Robert Cooper | Blog</title>"));
        assert!(first.contains("Older Posts"));
        assert!(first.contains(r#"<a href="/blog/" aria-current="page">blog</a>"#));

        let second = generator.render_blog_page(&pages[1]).unwrap();
        assert!(second.contains("<title>Robert Cooper | Blog | Page 2</title>"));
        assert!(second.contains("Newer Posts"));
        assert!(second.contains(r#"href="https://example.com/blog/2/""#));
    }

    #[test]
    fn test_project_page_colors() {
        let generator = HtmlGenerator::new(config());
        let meta = ProjectMeta {
            title: "React Montreal".to_string(),
            subtitle: Some("Meetup website".to_string()),
            text_color: Some("#fff".to_string()),
            background_color: Some("#61dafb".to_string()),
            ..Default::default()
        };
        let project = Project::new(meta, "<p>About</p>".to_string(), Path::new("projects/react-montreal.md"));
        let html = generator.render_project(&project).unwrap();

        assert!(html.contains(r#"style="color: #fff; background-color: #61dafb""#));
        assert!(html.contains("<title>React Montreal</title>"));
        assert!(html.contains(r#"content="Meetup website""#));

        let card = project_card(&project);
        assert!(card.contains(r#"href="/project/react-montreal/""#));
    }

    #[test]
    fn test_livereload_script() {
        let generator = HtmlGenerator::new(config()).with_livereload(true);
        let html = generator.render_not_found().unwrap();
        assert!(html.contains(LIVERELOAD_PATH));

        let plain = HtmlGenerator::new(config()).render_not_found().unwrap();
        assert!(!plain.contains("EventSource"));
    }

    #[test]
    fn test_feed_link_follows_config() {
        let mut config = config();
        config.rss.enabled = false;
        let html = HtmlGenerator::new(config).render_not_found().unwrap();
        assert!(!html.contains("application/rss+xml"));
    }

    #[test]
    fn test_output_path() {
        let out = Path::new("public");
        assert_eq!(HtmlGenerator::output_path("/", out), out.join("index.html"));
        assert_eq!(
            HtmlGenerator::output_path("/blog/2/", out),
            out.join("blog/2").join("index.html")
        );
        assert_eq!(HtmlGenerator::output_path("/404.html", out), out.join("404.html"));
    }
}
