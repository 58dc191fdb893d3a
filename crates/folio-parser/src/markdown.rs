//! Markdown parser using pulldown-cmark.

use std::{collections::HashMap, path::Path};

use folio_core::{
    Post, Project,
    content::slugify,
    error::CoreError,
    frontmatter::{PostMeta, ProjectMeta, parse_frontmatter},
};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use thiserror::Error;

use crate::syntax::{SyntaxHighlighter, html_escape};

/// Icon placed inside heading anchors.
const HASH_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" class="feather feather-hash"><line x1="4" y1="9" x2="20" y2="9"></line><line x1="4" y1="15" x2="20" y2="15"></line><line x1="10" y1="3" x2="8" y2="21"></line><line x1="16" y1="3" x2="14" y2="21"></line></svg>"#;

/// Markdown parsing errors.
#[derive(Debug, Error)]
pub enum MarkdownError {
    /// Failed to parse or validate frontmatter.
    #[error("frontmatter error: {0}")]
    Frontmatter(#[from] CoreError),
}

/// Result type for markdown operations.
pub type Result<T> = std::result::Result<T, MarkdownError>;

/// A heading found while rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Heading level (1-6).
    pub level: u8,

    /// Heading text.
    pub text: String,

    /// Anchor ID.
    pub id: String,
}

/// Output of rendering a markdown body.
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    /// HTML output.
    pub html: String,

    /// Plain text with code blocks and markup removed.
    pub text: String,

    /// Headings in document order.
    pub headings: Vec<Heading>,
}

/// Markdown parser with syntax highlighting support.
#[derive(Debug)]
pub struct MarkdownParser {
    highlighter: SyntaxHighlighter,
    options: Options,
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Heading events buffered until the heading closes.
struct HeadingBuffer<'a> {
    level: HeadingLevel,
    id: Option<String>,
    text: String,
    events: Vec<Event<'a>>,
}

/// Fenced or indented code collected until the block closes.
struct CodeBuffer {
    lang: Option<String>,
    content: String,
}

impl MarkdownParser {
    /// Create a new markdown parser with default options.
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self {
            highlighter: SyntaxHighlighter::default(),
            options,
        }
    }

    /// Create a parser with a custom syntax theme.
    pub fn with_theme(theme: &str) -> Self {
        let mut parser = Self::new();
        parser.highlighter.set_theme(theme);
        parser
    }

    /// Parse a blog post file.
    pub fn parse_post(&self, content: &str, path: &Path) -> Result<Post> {
        let (meta, body): (PostMeta, String) = parse_frontmatter(content, path)?;
        meta.validate(path)?;

        let rendered = self.render(&body);
        let post = Post::new(meta, rendered.html, rendered.text, path);
        post.validate_slug(path)?;
        Ok(post)
    }

    /// Parse a project file.
    pub fn parse_project(&self, content: &str, path: &Path) -> Result<Project> {
        let (meta, body): (ProjectMeta, String) = parse_frontmatter(content, path)?;
        meta.validate(path)?;

        let rendered = self.render(&body);
        let project = Project::new(meta, rendered.html, path);
        project.validate_slug(path)?;
        Ok(project)
    }

    /// Render a markdown body (no frontmatter) to HTML.
    pub fn render(&self, content: &str) -> Rendered {
        let parser = Parser::new_ext(content, self.options);
        let mut events: Vec<Event<'_>> = Vec::new();
        let mut rendered = Rendered::default();
        let mut heading: Option<HeadingBuffer<'_>> = None;
        let mut code: Option<CodeBuffer> = None;
        let mut seen_ids: HashMap<String, usize> = HashMap::new();

        for event in parser {
            if let Some(buffer) = code.as_mut() {
                match event {
                    Event::Text(text) => buffer.content.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        if let Some(buffer) = code.take() {
                            events.push(Event::Html(self.render_code_block(&buffer).into()));
                        }
                    }
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(str::to_string),
                        CodeBlockKind::Indented => None,
                    };
                    code = Some(CodeBuffer {
                        lang,
                        content: String::new(),
                    });
                }

                Event::Start(Tag::Heading { level, id, .. }) => {
                    heading = Some(HeadingBuffer {
                        level,
                        id: id.map(|i| i.to_string()),
                        text: String::new(),
                        events: Vec::new(),
                    });
                }

                Event::End(TagEnd::Heading(_)) => {
                    let Some(buffer) = heading.take() else {
                        continue;
                    };
                    let base_id = buffer.id.unwrap_or_else(|| slugify(&buffer.text));
                    let id = unique_id(&mut seen_ids, base_id);
                    let level = buffer.level as u8;

                    let mut inner = String::new();
                    html::push_html(&mut inner, buffer.events.into_iter());

                    events.push(Event::Html(CowStr::from(format!(
                        "<h{level} id=\"{id}\"><a class=\"anchor\" href=\"#{id}\" aria-hidden=\"true\">{HASH_ICON}</a>{inner}</h{level}>\n"
                    ))));

                    rendered.text.push_str(&buffer.text);
                    rendered.text.push('\n');
                    rendered.headings.push(Heading {
                        level,
                        text: buffer.text,
                        id,
                    });
                }

                other => {
                    match &other {
                        Event::Text(text) | Event::Code(text) => match heading.as_mut() {
                            Some(buffer) => buffer.text.push_str(text),
                            None => rendered.text.push_str(text),
                        },
                        Event::SoftBreak | Event::HardBreak => rendered.text.push(' '),
                        Event::End(
                            TagEnd::Paragraph
                            | TagEnd::Item
                            | TagEnd::TableCell
                            | TagEnd::BlockQuote(_),
                        ) => rendered.text.push('\n'),
                        _ => {}
                    }

                    match heading.as_mut() {
                        Some(buffer) => buffer.events.push(other),
                        None => events.push(other),
                    }
                }
            }
        }

        html::push_html(&mut rendered.html, events.into_iter());
        rendered
    }

    /// Render a closed code block: embeds for `video`/`youtube`, highlighted code otherwise.
    fn render_code_block(&self, block: &CodeBuffer) -> String {
        let embed = match block.lang.as_deref() {
            Some("video") => embed_source(&block.content).map(video_embed),
            Some("youtube") => embed_source(&block.content).map(youtube_embed),
            _ => None,
        };

        embed.unwrap_or_else(|| {
            self.highlighter
                .highlight(&block.content, block.lang.as_deref())
        })
    }
}

/// First non-empty line of an embed block, with an optional `src:` prefix removed.
fn embed_source(content: &str) -> Option<&str> {
    let line = content.lines().map(str::trim).find(|l| !l.is_empty())?;
    let src = line.strip_prefix("src:").map(str::trim).unwrap_or(line);
    (!src.is_empty()).then_some(src)
}

/// Looping, muted autoplay video with WebM and MP4 sources.
fn video_embed(src: &str) -> String {
    let src = html_escape(src);
    format!(
        "<video class=\"folio-video\" autoplay loop muted playsinline>\
<source src=\"{src}.webm\" type=\"video/webm\" />\
<source src=\"{src}.mp4\" type=\"video/mp4\" />\
</video>\n"
    )
}

/// YouTube iframe; a bare video ID is expanded to an embed URL.
fn youtube_embed(src: &str) -> String {
    let url = if src.contains('/') {
        src.to_string()
    } else {
        format!("https://www.youtube.com/embed/{src}")
    };
    format!(
        "<iframe class=\"folio-youtube\" width=\"560\" height=\"420\" src=\"{}\" frameborder=\"0\" \
allow=\"accelerometer; autoplay; encrypted-media; gyroscope; picture-in-picture\" allowfullscreen></iframe>\n",
        html_escape(&url)
    )
}

/// Suffix repeated heading IDs with `-1`, `-2`, ...
fn unique_id(seen: &mut HashMap<String, usize>, base: String) -> String {
    let count = seen.entry(base.clone()).or_insert(0);
    let id = if *count == 0 {
        base
    } else {
        format!("{base}-{count}")
    };
    *count += 1;
    id
}
