//! Error types for the windlass client

use thiserror::Error;
use windlass_core::domain::report::JobReport;
use windlass_core::dto::response::BodyError;

use crate::transport::TransportError;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while running a job against the orchestrator
///
/// Every variant is terminal for the invocation: nothing here is retried
/// internally. Each carries enough context (status code, raw body, or the
/// full rendered report) to diagnose the failure without re-running.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP exchange itself failed
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The orchestrator rejected the submission
    #[error("orchestrator rejected the deploy command (status {status}): {message}")]
    SubmissionRejected {
        /// HTTP status code of the rejection
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// A classified-successful response lacked an expected field
    #[error("malformed orchestrator response (status {status}): {detail}; body: {body}")]
    MalformedResponse {
        status: u16,
        detail: String,
        /// Raw body, serialized for the operator
        body: String,
    },

    /// A status poll or nodes fetch failed classification mid-lifecycle
    #[error("orchestrator rejected a job query (status {status}): {body}")]
    PollFailed {
        status: u16,
        /// Raw body, verbatim
        body: String,
    },

    /// The job reached a failed or stopped terminal state
    ///
    /// The full report is attached so the caller sees exactly what
    /// happened, not just a status word.
    #[error("job {} ended {}\n---------\n{}", .report.name, .report.state, .report.render())]
    JobFailed { report: JobReport },

    /// The final report could not be built from the responses
    #[error("failed to build the job report: {0}")]
    Report(#[from] BodyError),

    /// One or more environments failed their code deploy
    #[error("code deploy failed: {}", .failures.join("; "))]
    CodeDeployFailed { failures: Vec<String> },

    /// The run was canceled during an inter-poll delay
    #[error("job run canceled")]
    Canceled,
}

impl ClientError {
    /// The attached report, when the job itself failed
    pub fn report(&self) -> Option<&JobReport> {
        match self {
            Self::JobFailed { report } => Some(report),
            _ => None,
        }
    }

    /// Whether the orchestrator accepted the job but the job failed
    pub fn is_job_failure(&self) -> bool {
        matches!(self, Self::JobFailed { .. })
    }

    /// Whether the orchestrator refused the request outright
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::SubmissionRejected { .. } | Self::PollFailed { .. })
    }
}
