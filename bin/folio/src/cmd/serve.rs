//! Serve command - development server with live reload

use std::{path::Path, sync::Arc, time::Duration};

use color_eyre::eyre::{Result, WrapErr};
use folio_core::Config;
use folio_generator::BuildStats;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::{net::TcpListener, sync::mpsc};

use super::{SitePaths, load_config};
use crate::server::{ServerState, create_router};

/// Quiet period after a file event before rebuilding.
const DEBOUNCE: Duration = Duration::from_millis(200);

/// Run the serve command.
///
/// Builds the site with drafts and live reload, serves the output, and
/// rebuilds whenever content, static files or the config change.
pub async fn run(config_path: &Path, port: u16, open_browser: bool) -> Result<()> {
    tracing::info!(?config_path, port, "Starting dev server");

    let config = dev_config(load_config(config_path)?);
    let paths = SitePaths::resolve(config_path, &config);

    tracing::info!("Running initial build...");
    let stats = rebuild(config, paths.clone())
        .await?
        .wrap_err("Initial build failed")?;
    print_build_stats(&stats);

    let state = Arc::new(ServerState::new());

    let (tx, mut rx) = mpsc::channel::<()>(16);
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<notify::Event>| {
            let Ok(event) = res else { return };
            if matches!(
                event.kind,
                EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
            ) {
                // A full channel already has a rebuild queued.
                let _ = tx.try_send(());
            }
        },
        notify::Config::default(),
    )
    .wrap_err("Failed to create file watcher")?;

    for dir in [&paths.content, &paths.static_dir] {
        if dir.exists() {
            watcher
                .watch(dir, RecursiveMode::Recursive)
                .wrap_err_with(|| format!("Failed to watch {}", dir.display()))?;
            tracing::debug!(dir = %dir.display(), "Watching directory");
        }
    }
    watcher
        .watch(config_path, RecursiveMode::NonRecursive)
        .wrap_err("Failed to watch configuration file")?;

    let rebuild_state = state.clone();
    let rebuild_config_path = config_path.to_path_buf();
    let rebuild_paths = paths.clone();

    tokio::spawn(async move {
        while rx.recv().await.is_some() {
            tokio::time::sleep(DEBOUNCE).await;
            while rx.try_recv().is_ok() {}

            println!();
            println!("  File change detected, rebuilding...");

            match rebuild_from_disk(&rebuild_config_path, rebuild_paths.clone()).await {
                Ok(stats) => {
                    println!("  ✓ Rebuilt {} pages in {}ms", stats.pages, stats.duration_ms);
                    rebuild_state.notify_reload();
                }
                Err(e) => {
                    tracing::error!("Rebuild failed: {e:#}");
                    eprintln!("  ✗ Rebuild failed: {e:#}");
                }
            }
        }
    });

    let app = create_router(&paths.output, state);
    let addr = format!("127.0.0.1:{port}");

    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {addr}"))?;

    println!();
    println!("  Dev server running at http://{addr}");
    println!("  Press Ctrl+C to stop");
    println!();

    if open_browser {
        if let Err(e) = open::that(format!("http://{addr}")) {
            tracing::warn!("Failed to open browser: {e}");
        }
    }

    // Keep watcher alive
    let _watcher = watcher;

    axum::serve(listener, app).await.wrap_err("Server error")?;

    Ok(())
}

/// Development overrides: drafts are visible.
fn dev_config(mut config: Config) -> Config {
    config.build.drafts = true;
    config
}

/// Reload the configuration and rebuild into the original output directory.
async fn rebuild_from_disk(config_path: &Path, paths: SitePaths) -> Result<BuildStats> {
    let config = dev_config(load_config(config_path)?);
    let fresh = SitePaths::resolve(config_path, &config);
    let paths = SitePaths {
        output: paths.output,
        ..fresh
    };
    rebuild(config, paths).await?
}

/// Run a blocking build off the async runtime.
async fn rebuild(config: Config, paths: SitePaths) -> Result<Result<BuildStats>> {
    tokio::task::spawn_blocking(move || {
        paths
            .builder(config)
            .with_livereload(true)
            .build()
            .wrap_err("Build failed")
    })
    .await
    .wrap_err("Build task panicked")
}

/// Print build statistics in a user-friendly format.
fn print_build_stats(stats: &BuildStats) {
    println!();
    println!("  Build Statistics:");
    println!("  ─────────────────────────────────");
    println!("  Posts:        {:>6}", stats.posts);
    println!("  Projects:     {:>6}", stats.projects);
    println!("  Categories:   {:>6}", stats.categories);
    println!("  Assets:       {:>6}", stats.assets);
    println!("  ─────────────────────────────────");
    println!("  Total:        {:>6} pages", stats.pages);
    println!("  Duration:     {:>6}ms", stats.duration_ms);
    println!();
}
