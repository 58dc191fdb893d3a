//! Folio Generator Library
//!
//! Static site generation engine for Folio.
//!
//! # Modules
//!
//! - [`template`] - Flat HTML templates with variable interpolation
//! - [`html`] - Page rendering with SEO head, menu and footer
//! - [`collector`] - Post and project collection
//! - [`pagination`] - Blog index pagination
//! - [`rss`] - RSS feed generation
//! - [`sitemap`] - XML sitemap generation
//! - [`robots`] - robots.txt generation
//! - [`manifest`] - Web app manifest generation
//! - [`assets`] - Static and co-located asset copying
//! - [`build`] - Build orchestration

pub mod assets;
pub mod build;
pub mod collector;
pub mod html;
pub mod manifest;
pub mod pagination;
pub mod robots;
pub mod rss;
pub mod sitemap;
pub mod template;

pub use assets::AssetCopier;
pub use build::{BuildStats, Builder};
pub use collector::{ContentCollector, SiteContent};
pub use html::HtmlGenerator;
pub use manifest::ManifestGenerator;
pub use pagination::{Pager, paginate};
pub use robots::RobotsGenerator;
pub use rss::RssGenerator;
pub use sitemap::SitemapGenerator;
pub use template::{Template, TemplateContext, TemplateRegistry};
