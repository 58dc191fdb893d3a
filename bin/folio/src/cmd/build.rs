//! Build command - generates the static site

use std::{path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr};

use super::{SitePaths, load_config};

/// Run the build command.
///
/// `output`, `drafts` and `url` override the matching configuration values.
pub fn run(config_path: &Path, output: Option<&Path>, drafts: bool, url: Option<&str>) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?output, drafts, ?url, "Starting build");

    let mut config = load_config(config_path)?;

    if drafts {
        config.build.drafts = true;
    }
    if let Some(url) = url {
        tracing::info!(url, "Overriding site URL from CLI");
        config.site.url = url.to_string();
    }
    config.validate().wrap_err("Invalid configuration")?;

    let mut paths = SitePaths::resolve(config_path, &config);
    if let Some(output) = output {
        paths.output = output.to_path_buf();
    }

    tracing::debug!(?config, ?paths, "Loaded configuration");

    let stats = paths.builder(config).build().wrap_err("Build failed")?;
    let duration = start.elapsed();

    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Posts:      {}", stats.posts);
    println!("  Projects:   {}", stats.projects);
    println!("  Categories: {}", stats.categories);
    println!("  Pages:      {}", stats.pages);
    println!("  Assets:     {}", stats.assets);
    println!();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {}", paths.output.display());
    println!();

    tracing::info!(?stats, ?duration, "Build completed successfully");

    Ok(())
}
