//! Command implementations.

pub mod build;
pub mod check;
pub mod new;
pub mod serve;

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use folio_core::Config;
use folio_generator::Builder;

/// Site directories resolved against the directory holding the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePaths {
    /// Markdown content (`blog/`, `projects/`).
    pub content: PathBuf,
    /// Files copied verbatim into the output.
    pub static_dir: PathBuf,
    /// Build output.
    pub output: PathBuf,
}

impl SitePaths {
    /// Resolve the `[build]` directories of `config` relative to `config_path`.
    pub fn resolve(config_path: &Path, config: &Config) -> Self {
        let root = match config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Self {
            content: root.join(&config.build.content_dir),
            static_dir: root.join(&config.build.static_dir),
            output: root.join(&config.build.output_dir),
        }
    }

    /// Builder for these paths. The static directory is only used when it exists.
    pub fn builder(&self, config: Config) -> Builder {
        let builder = Builder::new(config, &self.content, &self.output);
        if self.static_dir.is_dir() {
            builder.with_static_dir(&self.static_dir)
        } else {
            builder
        }
    }
}

/// Load the configuration, applying `FOLIO__*` environment overrides.
pub fn load_config(config_path: &Path) -> Result<Config> {
    Config::load_with_env(config_path)
        .wrap_err_with(|| format!("Failed to load configuration from {}", config_path.display()))
}
