//! RSS feed generation.
//!
//! Generates an RSS 2.0 feed of blog posts with the full HTML body in
//! `content:encoded`.

use std::collections::BTreeMap;

use chrono::Utc;
use folio_core::{Config, Post};
use rss::{Category, ChannelBuilder, GuidBuilder, ImageBuilder, Item, ItemBuilder};
use tracing::debug;

/// Namespace of the `content:encoded` element.
pub const CONTENT_NAMESPACE: &str = "http://purl.org/rss/1.0/modules/content/";

/// RSS feed generator.
#[derive(Debug)]
pub struct RssGenerator {
    config: Config,
}

impl RssGenerator {
    /// Create a new RSS generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Generate feed XML. `posts` must already be ordered newest first.
    pub fn generate(&self, posts: &[Post]) -> String {
        let limit = self.config.rss.limit;
        debug!(count = posts.len().min(limit), limit, "generating RSS feed");

        let items: Vec<Item> = posts.iter().take(limit).map(|post| self.item(post)).collect();

        let site = &self.config.site;
        let namespaces = BTreeMap::from([("content".to_string(), CONTENT_NAMESPACE.to_string())]);
        let image = ImageBuilder::default()
            .url(self.config.url_for(&site.image_path))
            .title(site.title.as_str())
            .link(self.config.url_for("/"))
            .build();

        let channel = ChannelBuilder::default()
            .title(site.title.as_str())
            .link(self.config.url_for("/"))
            .description(site.description.as_deref().unwrap_or(&site.title))
            .language(Some(site.language.clone()))
            .last_build_date(Some(Utc::now().to_rfc2822()))
            .generator(Some("Folio".to_string()))
            .image(Some(image))
            .namespaces(namespaces)
            .items(items)
            .build();

        channel.to_string()
    }

    /// Convert a post to an RSS item.
    fn item(&self, post: &Post) -> Item {
        let url = self.config.url_for(&post.url);
        let guid = GuidBuilder::default().value(url.as_str()).permalink(true).build();

        let categories: Vec<Category> = post
            .meta
            .categories
            .iter()
            .map(|name| Category {
                name: name.clone(),
                domain: None,
            })
            .collect();

        ItemBuilder::default()
            .title(Some(post.title().to_string()))
            .link(Some(url))
            .guid(Some(guid))
            .description(Some(post.summary()))
            .pub_date(post.date().map(|date| date.to_rfc2822()))
            .author(self.config.site.author.clone())
            .categories(categories)
            .content(Some(post.html.clone()))
            .build()
    }
}
