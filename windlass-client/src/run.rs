//! Job runner
//!
//! Drives one deploy job end to end: submit the command, poll the job
//! until it reaches a terminal state, fetch the per-node results, and
//! assemble the final report. Execution is sequential on the caller's
//! task; the only suspension points are the network calls and the fixed
//! inter-poll delay.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tracing::{info, warn};

use windlass_core::domain::job::{Job, JobState};
use windlass_core::domain::report::JobReport;
use windlass_core::dto::code_deploy::{CodeDeployCommand, DeployOutcome, deploy_outcomes};
use windlass_core::dto::deploy::{DeployCommand, JobParams};
use windlass_core::dto::report::build_report;
use windlass_core::dto::response::ApiResponse;

use crate::OrchestratorClient;
use crate::error::{ClientError, Result};
use crate::locator::JobLocator;

/// What to do when a cancellation signal arrives during the inter-poll
/// delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CancelPolicy {
    /// Record the signal and keep polling; the next poll starts
    /// immediately. This mirrors the historical behavior where an
    /// interrupt during the delay did not abort the job.
    #[default]
    Continue,

    /// Abort the run with [`ClientError::Canceled`]
    Stop,
}

/// Runner configuration
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Delay between status polls
    pub poll_delay: Duration,

    /// Cancellation token, observed only during the inter-poll delay
    pub cancel: Option<watch::Receiver<bool>>,

    /// Policy applied when the token signals
    pub cancel_policy: CancelPolicy,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            poll_delay: Duration::from_millis(500),
            cancel: None,
            cancel_policy: CancelPolicy::default(),
        }
    }
}

/// Runs deploy jobs to completion
pub struct JobRunner {
    client: OrchestratorClient,
    poll_delay: Duration,
    cancel: Option<watch::Receiver<bool>>,
    cancel_policy: CancelPolicy,
}

impl JobRunner {
    /// Creates a runner over the given client
    pub fn new(client: OrchestratorClient, options: RunOptions) -> Self {
        Self {
            client,
            poll_delay: options.poll_delay,
            cancel: options.cancel,
            cancel_policy: options.cancel_policy,
        }
    }

    /// Submits a deploy job and polls it to a terminal state
    ///
    /// Returns the final report when the job finished, or
    /// [`ClientError::JobFailed`] carrying that same report when it
    /// stopped or failed. Every other error is terminal for the
    /// invocation and never retried.
    pub async fn run(&mut self, params: JobParams) -> Result<JobReport> {
        let environment = params.environment.clone();
        let command = DeployCommand::from(params);

        let submission = self.client.submit_deploy(&command).await?;
        if !submission.is_success() {
            return Err(ClientError::SubmissionRejected {
                status: submission.status,
                message: submission.rejection_message(environment.as_deref()),
            });
        }

        // A classified-successful submission without a job id is a
        // malformed response, not a crash.
        let job_id = submission
            .job_id()
            .map_err(|err| malformed(&submission, err))?;

        let locator = JobLocator::parse(&job_id);
        info!(job = locator.short_id(), "created deploy job");

        let mut job = Job::new(job_id.clone());
        let final_status = loop {
            let status = self
                .client
                .job_status(&locator.status_path(), locator.port())
                .await?;
            if !status.is_success() {
                return Err(ClientError::PollFailed {
                    status: status.status,
                    body: status.body.to_string(),
                });
            }

            // Only the latest status entry is authoritative.
            let word = status.latest_state().map_err(|err| malformed(&status, err))?;
            job.state = JobState::from_wire(&word);

            if job.state.is_terminal() {
                break status;
            }

            self.delay().await?;
        };

        // One extra request, outside the poll loop.
        let nodes = self.client.job_nodes(locator.short_id()).await?;
        if !nodes.is_success() {
            return Err(ClientError::PollFailed {
                status: nodes.status,
                body: nodes.body.to_string(),
            });
        }

        let report = build_report(&final_status, &nodes, job.state)?;

        match job.state {
            JobState::Failed | JobState::Stopped => {
                warn!(job = locator.short_id(), state = %job.state, "deploy job did not finish");
                Err(ClientError::JobFailed { report })
            }
            _ => {
                info!(job = locator.short_id(), "deploy job finished");
                Ok(report)
            }
        }
    }

    /// Deploys code to the given environments via the code manager
    ///
    /// Waits for final outcomes; any environment that did not deploy
    /// cleanly fails the invocation.
    pub async fn run_code_deploy(&mut self, environments: Vec<String>) -> Result<Vec<DeployOutcome>> {
        let command = CodeDeployCommand::new(environments);

        let response = self.client.deploy_code(&command).await?;
        if !response.is_success() {
            return Err(ClientError::SubmissionRejected {
                status: response.status,
                message: response.rejection_message(None),
            });
        }

        let outcomes = deploy_outcomes(&response).map_err(|err| malformed(&response, err))?;

        let failures: Vec<String> = outcomes
            .iter()
            .filter(|outcome| outcome.is_failure())
            .map(DeployOutcome::describe)
            .collect();

        if failures.is_empty() {
            info!(count = outcomes.len(), "code deploy complete");
            Ok(outcomes)
        } else {
            Err(ClientError::CodeDeployFailed { failures })
        }
    }

    /// The fixed inter-poll delay, with cancellation observed
    ///
    /// The delay always runs to its deadline unless a cancellation
    /// signal arrives; a dropped sender or a withdrawn signal must not
    /// shorten it.
    async fn delay(&mut self) -> Result<()> {
        let deadline = time::Instant::now() + self.poll_delay;

        let Some(cancel) = self.cancel.as_mut() else {
            time::sleep_until(deadline).await;
            return Ok(());
        };

        let mut canceled = *cancel.borrow_and_update();
        while !canceled {
            tokio::select! {
                _ = time::sleep_until(deadline) => return Ok(()),
                changed = cancel.changed() => {
                    if changed.is_err() {
                        // Sender gone; no signal can arrive anymore.
                        time::sleep_until(deadline).await;
                        return Ok(());
                    }
                    canceled = *cancel.borrow_and_update();
                }
            }
        }

        match self.cancel_policy {
            CancelPolicy::Continue => {
                warn!("cancellation requested; continuing to poll");
                Ok(())
            }
            CancelPolicy::Stop => Err(ClientError::Canceled),
        }
    }
}

fn malformed(response: &ApiResponse, err: windlass_core::dto::response::BodyError) -> ClientError {
    ClientError::MalformedResponse {
        status: response.status,
        detail: err.to_string(),
        body: response.body.to_string(),
    }
}
