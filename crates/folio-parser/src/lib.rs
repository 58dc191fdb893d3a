//! Folio Parser Library
//!
//! Markdown rendering for blog posts and project pages.
//!
//! # Modules
//!
//! - [`markdown`] - Markdown to HTML with heading anchors and embed blocks
//! - [`syntax`] - Build-time syntax highlighting for code blocks

pub mod markdown;
pub mod syntax;

pub use markdown::{Heading, MarkdownError, MarkdownParser, Rendered};
pub use syntax::SyntaxHighlighter;
