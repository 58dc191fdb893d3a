//! Folio CLI
//!
//! Builds and serves a blog and project portfolio from Markdown.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use folio::cmd::new::ContentKind;

/// Command-line interface for Folio.
#[derive(Parser)]
#[command(name = "folio", version, about = "Static site generator for a blog and portfolio")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "folio.toml")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Build the site for production
    Build {
        /// Output directory, overriding build.output_dir
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Include draft posts and projects
        #[arg(long)]
        drafts: bool,
        /// Override the site URL (e.g., https://example.com)
        #[arg(long)]
        url: Option<String>,
    },
    /// Start a development server with live reload
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
        /// Open browser automatically
        #[arg(long)]
        open: bool,
    },
    /// Scaffold a new post or project
    New {
        /// Title of the new content
        title: String,
        /// Kind of content to create
        #[arg(short, long, value_enum, default_value_t = ContentKind::Post)]
        kind: ContentKind,
    },
    /// Validate configuration and content
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    folio::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build { output, drafts, url } => {
            folio::cmd::build::run(&cli.config, output.as_deref(), drafts, url.as_deref())?;
        }
        Commands::Serve { port, open } => {
            folio::cmd::serve::run(&cli.config, port, open).await?;
        }
        Commands::New { title, kind } => {
            folio::cmd::new::run(&cli.config, &title, kind)?;
        }
        Commands::Check { strict } => {
            folio::cmd::check::run(&cli.config, strict)?;
        }
    }

    Ok(())
}
