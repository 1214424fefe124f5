//! Job report domain types
//!
//! The aggregated outcome of one deploy job: final state plus per-node
//! resource-event counts, assembled once after the job reaches a terminal
//! state and immutable from then on.

use serde::{Deserialize, Serialize};

use crate::domain::job::JobState;

/// Final report for one deploy job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReport {
    /// Job name as assigned by the orchestrator
    pub name: String,

    /// Terminal state the job ended in
    pub state: JobState,

    /// Name of the environment the job ran against
    pub environment: String,

    /// Number of nodes the job covered
    pub node_count: u64,

    /// Per-node outcomes, in orchestrator order
    pub nodes: Vec<NodeReport>,
}

/// Outcome for a single node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeReport {
    /// Node certname
    pub name: String,

    /// Resource-event counts; absent when the run never took place
    pub metrics: Option<NodeMetrics>,

    /// Diagnostic message; only meaningful when there are no metrics
    /// (e.g. the node was unreachable)
    pub message: Option<String>,
}

/// Resource-event counts for one node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeMetrics {
    pub failed: u64,
    pub changed: u64,
    pub skipped: u64,

    /// Corrective-change count; not reported by older orchestrator versions
    pub corrective: Option<u64>,

    /// Link to the full node run report
    pub report_url: Option<String>,
}

impl JobReport {
    /// Renders the human-readable report block
    ///
    /// Pure function of the report contents; rendering twice yields
    /// byte-identical output.
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("Job Name: {}\n", self.name));
        out.push_str(&format!("Status: {}\n", self.state));
        out.push_str(&format!("Environment: {}\n", self.environment));
        out.push_str(&format!("Nodes: {}\n\n", self.node_count));

        for node in &self.nodes {
            out.push_str(&format!("{}\n", node.name));

            match &node.metrics {
                Some(metrics) => {
                    out.push_str("  Resource Events: ");
                    out.push_str(&format!("{} failed   ", metrics.failed));
                    out.push_str(&format!("{} changed   ", metrics.changed));

                    // Not reported by orchestrator versions that predate
                    // corrective-change tracking.
                    if let Some(corrective) = metrics.corrective {
                        out.push_str(&format!("{} corrective   ", corrective));
                    }

                    out.push_str(&format!("{} skipped    ", metrics.skipped));
                    out.push('\n');

                    if let Some(url) = &metrics.report_url {
                        out.push_str(&format!("  Report URL: {}\n", url));
                    }
                    out.push('\n');
                }
                None => {
                    // A message is always present, but it only carries
                    // information when the run never took place.
                    if let Some(message) = &node.message {
                        out.push_str(&format!("{}\n\n", message));
                    }
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> JobReport {
        JobReport {
            name: "123".to_string(),
            state: JobState::Finished,
            environment: "production".to_string(),
            node_count: 3,
            nodes: vec![
                NodeReport {
                    name: "web-01.example.com".to_string(),
                    metrics: Some(NodeMetrics {
                        failed: 1,
                        changed: 2,
                        skipped: 0,
                        corrective: None,
                        report_url: Some("https://pe.example.com/report/web-01".to_string()),
                    }),
                    message: None,
                },
                NodeReport {
                    name: "db-01.example.com".to_string(),
                    metrics: None,
                    message: Some("Transport error: unreachable".to_string()),
                },
            ],
        }
    }

    #[test]
    fn test_render_metrics_line_without_corrective() {
        let text = sample_report().render();
        assert!(text.contains("  Resource Events: 1 failed   2 changed   0 skipped    \n"));
        assert!(!text.contains("corrective"));
    }

    #[test]
    fn test_render_metrics_line_with_corrective() {
        let mut report = sample_report();
        if let Some(metrics) = &mut report.nodes[0].metrics {
            metrics.corrective = Some(4);
        }
        let text = report.render();
        assert!(
            text.contains("  Resource Events: 1 failed   2 changed   4 corrective   0 skipped    \n")
        );
    }

    #[test]
    fn test_render_header_lines() {
        let text = sample_report().render();
        assert!(text.starts_with("Job Name: 123\nStatus: finished\nEnvironment: production\nNodes: 3\n\n"));
    }

    #[test]
    fn test_render_report_url() {
        let text = sample_report().render();
        assert!(text.contains("  Report URL: https://pe.example.com/report/web-01\n"));
    }

    #[test]
    fn test_render_message_when_metrics_absent() {
        let text = sample_report().render();
        assert!(text.contains("db-01.example.com\nTransport error: unreachable\n\n"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let report = sample_report();
        assert_eq!(report.render(), report.render());
    }

    #[test]
    fn test_render_node_without_metrics_or_message() {
        let report = JobReport {
            name: "9".to_string(),
            state: JobState::Failed,
            environment: "staging".to_string(),
            node_count: 1,
            nodes: vec![NodeReport {
                name: "silent.example.com".to_string(),
                metrics: None,
                message: None,
            }],
        };
        let text = report.render();
        assert!(text.ends_with("silent.example.com\n"));
    }
}
