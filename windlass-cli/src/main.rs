//! Windlass CLI
//!
//! Command-line interface for running deploy jobs against a remote
//! orchestrator and deploying code through the code manager.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "windlass")]
#[command(about = "Run deploy jobs against a remote orchestrator", long_about = None)]
struct Cli {
    /// Orchestrator host (scheme optional, defaults to https)
    #[arg(long, env = "WINDLASS_HOST")]
    host: String,

    /// Authentication token
    #[arg(long, env = "WINDLASS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Read the authentication token from a file
    #[arg(long, conflicts_with = "token")]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "windlass=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::resolve(cli.host, cli.token, cli.token_file)?;
    config.validate()?;

    handle_command(cli.command, &config).await
}
