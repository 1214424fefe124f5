//! Job domain types

use serde::{Deserialize, Serialize};

/// A deploy job tracked on the orchestrator
///
/// Created from a successful submission response; its state is advanced
/// by the poll loop until it reaches a terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Opaque job identifier; may be a bare id or a full URL depending
    /// on the orchestrator version
    pub id: String,

    /// Last observed state
    pub state: JobState,
}

impl Job {
    /// Creates a job in its initial (not yet polled) state
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: JobState::Unknown,
        }
    }
}

/// Job execution state as reported by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    /// State word not recognized (includes `new` and other pre-run states)
    Unknown,

    /// Job is executing
    Running,

    /// Job completed successfully
    Finished,

    /// Job was stopped before completion
    Stopped,

    /// Job completed with failures
    Failed,
}

impl JobState {
    /// Maps an orchestrator state word onto the lifecycle
    ///
    /// Only the exact lowercase wire words are recognized; anything else
    /// is `Unknown`, which keeps the poll loop going.
    pub fn from_wire(word: &str) -> Self {
        match word {
            "running" => JobState::Running,
            "finished" => JobState::Finished,
            "stopped" => JobState::Stopped,
            "failed" => JobState::Failed,
            _ => JobState::Unknown,
        }
    }

    /// Whether no further state transition can occur
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Finished | JobState::Stopped | JobState::Failed
        )
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Unknown => write!(f, "unknown"),
            JobState::Running => write!(f, "running"),
            JobState::Finished => write!(f, "finished"),
            JobState::Stopped => write!(f, "stopped"),
            JobState::Failed => write!(f, "failed"),
        }
    }
}
