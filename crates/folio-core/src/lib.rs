//! Folio Core Library
//!
//! Core types, configuration, and error handling for the Folio site generator.

pub mod config;
pub mod content;
pub mod error;
pub mod frontmatter;

pub use config::Config;
pub use content::{Post, Project, slugify};
pub use error::{CoreError, Result};
pub use frontmatter::{PostMeta, ProjectMeta};
