//! GroundCrew CLI — the main entry point.
//!
//! Commands:
//! - `serve`  — Start the HTTP gateway
//! - `models` — List the advertised model catalog
//! - `doctor` — Probe configured providers

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "groundcrew",
    about = "GroundCrew — file-grounded LLM chat backend",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use a specific config file instead of ~/.groundcrew/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List the advertised models
    Models,

    /// Probe configured providers
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => groundcrew_config::AppConfig::load_from(path)?,
        None => groundcrew_config::AppConfig::load()?,
    };

    match cli.command {
        Commands::Serve { port } => commands::serve::run(config, port).await?,
        Commands::Models => commands::models::run(),
        Commands::Doctor => commands::doctor::run(config).await,
    }

    Ok(())
}
