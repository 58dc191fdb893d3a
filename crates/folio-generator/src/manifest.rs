//! Web app manifest generation.

use std::{fs, path::Path};

use folio_core::Config;
use serde::Serialize;
use tracing::info;

/// File name of the manifest inside the output directory.
pub const MANIFEST_FILE: &str = "manifest.webmanifest";

/// An icon entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestIcon {
    pub src: String,
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// The `manifest.webmanifest` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebManifest {
    pub name: String,
    pub short_name: String,
    pub start_url: String,
    pub background_color: String,
    pub theme_color: String,
    pub display: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub icons: Vec<ManifestIcon>,
}

/// Web app manifest generator.
#[derive(Debug)]
pub struct ManifestGenerator {
    config: Config,
}

impl ManifestGenerator {
    /// Create a new manifest generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Build the manifest from configuration.
    pub fn manifest(&self) -> WebManifest {
        let manifest = &self.config.manifest;
        let icons = manifest
            .icon
            .iter()
            .map(|src| ManifestIcon {
                src: src.clone(),
                sizes: "512x512".to_string(),
                mime_type: icon_mime_type(src).to_string(),
            })
            .collect();

        WebManifest {
            name: self.config.manifest_name().to_string(),
            short_name: self.config.manifest_short_name().to_string(),
            start_url: "/".to_string(),
            background_color: manifest.background_color.clone(),
            theme_color: manifest.theme_color.clone(),
            display: "standalone".to_string(),
            icons,
        }
    }

    /// Serialize the manifest as pretty JSON.
    pub fn generate(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.manifest())
    }

    /// Write the manifest into `output_dir`.
    pub fn write(&self, output_dir: &Path) -> std::io::Result<()> {
        info!("generating web app manifest");
        let json = self.generate().map_err(std::io::Error::other)?;
        fs::write(output_dir.join(MANIFEST_FILE), json)
    }
}

fn icon_mime_type(src: &str) -> &'static str {
    match src.rsplit('.').next().map(str::to_ascii_lowercase).as_deref() {
        Some("svg") => "image/svg+xml",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}
