//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod code;
mod job;

pub use code::CodeCommands;
pub use job::JobCommands;

use std::sync::Arc;

use anyhow::Result;
use clap::Subcommand;
use windlass_client::{HttpTransport, OrchestratorClient};

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Deploy jobs
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Code-manager deploys
    Code {
        #[command(subcommand)]
        command: CodeCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Job { command } => job::handle_job_command(command, config).await,
        Commands::Code { command } => code::handle_code_command(command, config).await,
    }
}

/// Builds the orchestrator client from the resolved configuration
fn client_for(config: &Config) -> OrchestratorClient {
    let transport = Arc::new(HttpTransport::new(
        config.host.clone(),
        config.token.clone(),
    ));
    OrchestratorClient::new(transport)
}
