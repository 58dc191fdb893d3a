//! Robots.txt generation.

use std::{fs, path::Path};

use folio_core::Config;
use tracing::info;

/// Robots.txt generator.
#[derive(Debug)]
pub struct RobotsGenerator {
    config: Config,
}

impl RobotsGenerator {
    /// Create a new robots generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Contents of robots.txt: allow everything and point at the sitemap.
    pub fn generate(&self) -> String {
        format!(
            "User-agent: *\nAllow: /\n\nSitemap: {}\n",
            self.config.url_for("sitemap.xml")
        )
    }

    /// Write robots.txt into `output_dir`.
    pub fn write(&self, output_dir: &Path) -> std::io::Result<()> {
        info!("generating robots.txt");
        fs::write(output_dir.join("robots.txt"), self.generate())
    }
}
