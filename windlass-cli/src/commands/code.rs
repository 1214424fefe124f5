//! Code deploy command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use windlass_client::{JobRunner, RunOptions};
use windlass_core::dto::code_deploy::DeployOutcome;

use crate::commands::client_for;
use crate::config::Config;

/// Code-manager subcommands
#[derive(Subcommand)]
pub enum CodeCommands {
    /// Deploy code to environments and wait for the outcomes
    Deploy {
        /// Environment to deploy (repeatable)
        #[arg(long = "environment", required = true)]
        environments: Vec<String>,

        /// Print the outcomes as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Handle code-manager commands
pub async fn handle_code_command(command: CodeCommands, config: &Config) -> Result<()> {
    match command {
        CodeCommands::Deploy { environments, json } => {
            let mut runner = JobRunner::new(client_for(config), RunOptions::default());

            let outcomes = runner.run_code_deploy(environments).await?;
            print_outcomes(&outcomes, json)?;
            Ok(())
        }
    }
}

fn print_outcomes(outcomes: &[DeployOutcome], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcomes)?);
        return Ok(());
    }

    println!(
        "{}",
        format!("Deployed {} environment(s):", outcomes.len()).bold()
    );
    for outcome in outcomes {
        let status = outcome.status.as_deref().unwrap_or("unknown");
        println!(
            "  {} {} {}",
            "▸".cyan(),
            outcome.environment,
            status.green()
        );
    }

    Ok(())
}
