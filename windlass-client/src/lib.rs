//! Windlass HTTP Client
//!
//! Client library for running deploy jobs against a remote orchestrator:
//! submit a deploy command, poll the job to a terminal state, fetch the
//! per-node results, and assemble the final report.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use windlass_client::{HttpTransport, JobRunner, OrchestratorClient, RunOptions};
//! use windlass_core::dto::deploy::JobParams;
//!
//! #[tokio::main]
//! async fn main() -> windlass_client::Result<()> {
//!     let transport = Arc::new(HttpTransport::new("pe.example.com", "token"));
//!     let client = OrchestratorClient::new(transport);
//!
//!     let mut runner = JobRunner::new(client, RunOptions::default());
//!     let report = runner
//!         .run(JobParams {
//!             environment: Some("production".to_string()),
//!             ..Default::default()
//!         })
//!         .await?;
//!
//!     println!("{}", report.render());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod locator;
pub mod run;
pub mod transport;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use locator::{JobLocator, ORCHESTRATOR_PORT};
pub use run::{CancelPolicy, JobRunner, RunOptions};
pub use transport::{HttpTransport, Method, Transport};

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;
use windlass_core::dto::code_deploy::CodeDeployCommand;
use windlass_core::dto::deploy::DeployCommand;
use windlass_core::dto::response::ApiResponse;

/// Deploy command submission path
const DEPLOY_COMMAND_PATH: &str = "/orchestrator/v1/command/deploy";

/// Code-manager deploy path and service port
const CODE_DEPLOY_PATH: &str = "/code-manager/v1/deploys";
const CODE_MANAGER_PORT: u16 = 8170;

/// Client for the orchestrator and code-manager services
///
/// A thin request layer over the [`Transport`] seam: each operation is
/// one exchange, with no caching and no retries. Classification of the
/// returned [`ApiResponse`] is left to the caller.
#[derive(Clone)]
pub struct OrchestratorClient {
    transport: Arc<dyn Transport>,
}

impl OrchestratorClient {
    /// Creates a client over the given transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Submits a deploy command
    pub async fn submit_deploy(&self, command: &DeployCommand) -> Result<ApiResponse> {
        debug!("submitting deploy command");
        let body = command_body(command);
        let response = self
            .transport
            .send(Method::Post, DEPLOY_COMMAND_PATH, ORCHESTRATOR_PORT, Some(&body))
            .await?;
        Ok(response)
    }

    /// Fetches a job's status from the path and port its locator resolved
    pub async fn job_status(&self, path: &str, port: u16) -> Result<ApiResponse> {
        debug!(path, port, "polling job status");
        let response = self.transport.send(Method::Get, path, port, None).await?;
        Ok(response)
    }

    /// Fetches a job's per-node results
    ///
    /// Always addressed by short id on the fixed orchestrator port,
    /// whatever form the job id arrived in.
    pub async fn job_nodes(&self, short_id: &str) -> Result<ApiResponse> {
        let path = format!("/orchestrator/v1/jobs/{}/nodes", short_id);
        debug!(path, "fetching job nodes");
        let response = self
            .transport
            .send(Method::Get, &path, ORCHESTRATOR_PORT, None)
            .await?;
        Ok(response)
    }

    /// Submits a code-manager deploy
    pub async fn deploy_code(&self, command: &CodeDeployCommand) -> Result<ApiResponse> {
        debug!(environments = ?command.environments, "submitting code deploy");
        let body = command_body(command);
        let response = self
            .transport
            .send(Method::Post, CODE_DEPLOY_PATH, CODE_MANAGER_PORT, Some(&body))
            .await?;
        Ok(response)
    }
}

/// Serializes a command struct for the wire
///
/// The command types are plain structs of strings, numbers, and bools;
/// their serialization cannot fail.
fn command_body<T: serde::Serialize>(command: &T) -> Value {
    serde_json::to_value(command).unwrap_or(Value::Null)
}

impl std::fmt::Debug for OrchestratorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrchestratorClient").finish_non_exhaustive()
    }
}
