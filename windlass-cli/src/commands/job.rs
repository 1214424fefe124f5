//! Job command handlers
//!
//! Runs a deploy job to completion and prints its report. Ctrl-C is
//! bridged onto the runner's cancellation token; by default the run
//! keeps polling through an interrupt, matching the orchestrator's
//! own job lifecycle.

use std::time::Duration;

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use colored::*;
use tokio::sync::watch;
use windlass_client::{CancelPolicy, JobRunner, RunOptions};
use windlass_core::domain::job::JobState;
use windlass_core::domain::report::JobReport;
use windlass_core::dto::deploy::JobParams;

use crate::commands::client_for;
use crate::config::Config;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// Run a deploy job and wait for it to finish
    Deploy {
        /// Environment to deploy
        #[arg(long)]
        environment: Option<String>,

        /// Legacy flat target list; overrides every scope flag
        #[arg(long)]
        target: Option<String>,

        /// Node to include in the scope (repeatable)
        #[arg(long = "node")]
        nodes: Vec<String>,

        /// Application name for the scope
        #[arg(long)]
        application: Option<String>,

        /// Query expression for the scope
        #[arg(long)]
        query: Option<String>,

        /// Maximum nodes to run concurrently
        #[arg(long)]
        concurrency: Option<u64>,

        /// Simulate without applying changes
        #[arg(long)]
        noop: bool,

        /// Milliseconds between status polls
        #[arg(long, default_value_t = 500)]
        poll_interval_ms: u64,

        /// What to do when interrupted between polls
        #[arg(long, value_enum, default_value = "continue")]
        on_interrupt: OnInterrupt,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Interrupt handling during the inter-poll delay
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OnInterrupt {
    /// Record the interrupt and keep polling
    Continue,
    /// Abort the run
    Stop,
}

impl From<OnInterrupt> for CancelPolicy {
    fn from(value: OnInterrupt) -> Self {
        match value {
            OnInterrupt::Continue => CancelPolicy::Continue,
            OnInterrupt::Stop => CancelPolicy::Stop,
        }
    }
}

/// Handle job commands
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    match command {
        JobCommands::Deploy {
            environment,
            target,
            nodes,
            application,
            query,
            concurrency,
            noop,
            poll_interval_ms,
            on_interrupt,
            json,
        } => {
            let params = JobParams {
                target,
                nodes,
                application,
                query,
                concurrency,
                noop,
                environment,
            };

            let options = RunOptions {
                poll_delay: Duration::from_millis(poll_interval_ms),
                cancel: Some(interrupt_token()),
                cancel_policy: on_interrupt.into(),
            };

            deploy(params, options, config, json).await
        }
    }
}

async fn deploy(
    params: JobParams,
    options: RunOptions,
    config: &Config,
    json: bool,
) -> Result<()> {
    let mut runner = JobRunner::new(client_for(config), options);

    match runner.run(params).await {
        Ok(report) => {
            print_report(&report, json)?;
            Ok(())
        }
        Err(err) => {
            // A terminal job failure still carries the full report;
            // show it before failing the invocation.
            if let Some(report) = err.report() {
                print_report(report, json)?;
                anyhow::bail!("job {} ended {}", report.name, report.state);
            }
            Err(err.into())
        }
    }
}

/// Bridges Ctrl-C onto the runner's cancellation token
fn interrupt_token() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(true);
        }
    });
    rx
}

fn print_report(report: &JobReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!(
            "{} Job {} {}",
            "▸".cyan(),
            report.name.bold(),
            colorize_state(report.state)
        );
        println!();
        print!("{}", report.render());
    }
    Ok(())
}

/// Colorize a job state for terminal output
pub(crate) fn colorize_state(state: JobState) -> ColoredString {
    let word = state.to_string();
    match state {
        JobState::Finished => word.green(),
        JobState::Failed => word.red(),
        JobState::Stopped => word.yellow(),
        JobState::Running => word.cyan(),
        JobState::Unknown => word.dimmed(),
    }
}
