//! linkpage CLI - build and live-edit link-in-bio pages.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "linkpage")]
#[command(about = "Build and live-edit link-in-bio pages")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to linkpage.toml config file
    #[arg(short, long, default_value = "linkpage.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a config file and a sample profile
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Start the editor with live preview
    Dev {
        /// Port to listen on (defaults to config or 7878)
        #[arg(short, long)]
        port: Option<u16>,

        /// Profile file to edit (defaults to config)
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Export every profile as a static page
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minify the inline stylesheet
        #[arg(long)]
        minify_styles: bool,

        /// Embed profile text without escaping
        #[arg(long)]
        raw: bool,
    },

    /// Preview exported pages
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve (defaults to the configured build output)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Dev {
            port,
            profile,
            no_open,
        } => {
            commands::dev::run(&cli.config, port, profile, !no_open).await?;
        }
        Commands::Build {
            output,
            minify_styles,
            raw,
        } => {
            let overrides = commands::build::BuildOverrides {
                output,
                minify_styles: minify_styles.then_some(true),
                escape: raw.then_some(false),
            };
            commands::build::run(&cli.config, overrides).await?;
        }
        Commands::Serve { port, dir, no_open } => {
            commands::serve::run(&cli.config, port, dir, !no_open).await?;
        }
    }

    Ok(())
}
