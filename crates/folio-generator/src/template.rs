//! Flat HTML templates with variable interpolation.
//!
//! Pages are plain strings with `{{ name }}` placeholders. A trailing `?`
//! (`{{ name? }}`) marks a placeholder that renders empty when unset.
//! Values are inserted verbatim, so callers escape text with [`escape_html`].

use std::collections::HashMap;

use thiserror::Error;

/// Template rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Missing required variable.
    #[error("missing required variable: {0}")]
    MissingVariable(String),

    /// Template not found.
    #[error("template not found: {0}")]
    NotFound(String),

    /// Invalid template syntax.
    #[error("invalid template syntax: {0}")]
    InvalidSyntax(String),
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Variables available to a template.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: HashMap<String, String>,
}

impl TemplateContext {
    /// Create a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable into the context.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert the variable only when `value` is `Some`.
    #[must_use]
    pub fn with_opt(mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    /// Get a variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

/// A named template string.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    content: String,
}

impl Template {
    /// Create a new template with the given name and content.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Get the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the template with the given context.
    ///
    /// Substituted values are never rescanned, so a value containing
    /// `{{` is emitted as-is.
    pub fn render(&self, context: &TemplateContext) -> Result<String> {
        let mut output = String::with_capacity(self.content.len());
        let mut rest = self.content.as_str();

        while let Some(start) = rest.find("{{") {
            output.push_str(&rest[..start]);

            let after_open = &rest[start + 2..];
            let end = after_open.find("}}").ok_or_else(|| {
                TemplateError::InvalidSyntax(format!("unclosed {{{{ in template {}", self.name))
            })?;

            let placeholder = after_open[..end].trim();
            let (name, optional) = match placeholder.strip_suffix('?') {
                Some(name) => (name.trim(), true),
                None => (placeholder, false),
            };

            match context.get(name) {
                Some(value) => output.push_str(value),
                None if optional => {}
                None => return Err(TemplateError::MissingVariable(name.to_string())),
            }

            rest = &after_open[end + 2..];
        }

        output.push_str(rest);
        Ok(output)
    }
}

/// Registry of templates by name.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    /// Create a registry holding the built-in templates.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register(Template::new("base", BASE_TEMPLATE));
        registry.register(Template::new("home", HOME_TEMPLATE));
        registry.register(Template::new("post", POST_TEMPLATE));
        registry.register(Template::new("list", LIST_TEMPLATE));
        registry.register(Template::new("category", CATEGORY_TEMPLATE));
        registry.register(Template::new("project", PROJECT_TEMPLATE));
        registry.register(Template::new("projects", PROJECTS_TEMPLATE));
        registry.register(Template::new("not_found", NOT_FOUND_TEMPLATE));
        registry
    }

    /// Register a template, replacing any template with the same name.
    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.name.clone(), template);
    }

    /// Get a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Render a named template with the given context.
    pub fn render(&self, name: &str, context: &TemplateContext) -> Result<String> {
        let template = self
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
        template.render(context)
    }
}

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Document shell shared by every page.
pub const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="{{ lang }}" data-theme="{{ theme }}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}</title>
    {{ seo }}
    <link rel="canonical" href="{{ canonical_url }}">
    <link rel="manifest" href="/manifest.webmanifest">
    <meta name="theme-color" content="{{ theme_color }}">
    {{ feed_link? }}
    <link rel="stylesheet" href="/style.css">
    <script type="module">import init from '/pkg/folio_frontend.js'; init();</script>
    {{ livereload? }}
</head>
<body>
    {{ reading_progress? }}
    <header class="menu">
        <div class="container menu-inner">
            {{ menu_title }}
            <nav aria-label="Main navigation">
                <ul class="nav-list">
                    {{ menu }}
                </ul>
            </nav>
            <div id="theme-switch"></div>
        </div>
    </header>
    <main>
        {{ content }}
    </main>
    <footer>
        <div class="container">
            <p>&copy; {{ year }} {{ author }}{{ feed_footer? }}</p>
        </div>
    </footer>
</body>
</html>
"##;

/// Landing page with recent posts and projects.
pub const HOME_TEMPLATE: &str = r#"<section class="container home">
    <p class="intro">{{ description }}</p>
    <h2>Recent posts</h2>
    <ul class="post-list">
        {{ posts }}
    </ul>
    <p><a href="/blog/">All posts</a></p>
    <h2>Projects</h2>
    <div class="project-grid">
        {{ projects }}
    </div>
</section>"#;

/// Blog post body.
pub const POST_TEMPLATE: &str = r#"<article class="container post">
    <header>
        <h1>{{ title }}</h1>
        <p class="post-meta"><time datetime="{{ date_iso? }}">{{ date_formatted? }}</time> &middot; {{ time_to_read }} min read</p>
    </header>
    {{ banner? }}
    <div class="content">
        {{ content }}
    </div>
    {{ categories? }}
    {{ post_nav? }}
</article>"#;

/// Paginated blog index.
pub const LIST_TEMPLATE: &str = r#"<section class="container blog">
    <h1>Blog</h1>
    <p class="description">{{ description }}</p>
    <ul class="post-list">
        {{ items }}
    </ul>
    {{ pagination? }}
</section>"#;

/// Posts in one category.
pub const CATEGORY_TEMPLATE: &str = r#"<section class="container category">
    <h1>Category: <span>{{ category }}</span></h1>
    <ul class="post-list">
        {{ items }}
    </ul>
</section>"#;

/// Single project page.
pub const PROJECT_TEMPLATE: &str = r#"<article class="project">
    <header class="project-hero" style="{{ hero_style? }}">
        <div class="container">
            <h1>{{ title }}</h1>
            <p class="subtitle">{{ subtitle? }}</p>
        </div>
    </header>
    <div class="container content">
        {{ content }}
    </div>
</article>"#;

/// Project overview.
pub const PROJECTS_TEMPLATE: &str = r#"<section class="container projects">
    <h1>Projects</h1>
    <div class="project-grid">
        {{ items }}
    </div>
</section>"#;

/// 404 page.
pub const NOT_FOUND_TEMPLATE: &str = r#"<section class="container not-found">
    <h1>Page not found</h1>
    <p>Nothing lives at this address. Try the <a href="/">home page</a> or the <a href="/blog/">blog</a>.</p>
</section>"#;
