//! Deploy command DTOs
//!
//! Builds the body for the orchestrator's deploy command from caller
//! parameters. Node selection uses one of two strategies: the legacy
//! flat `target` list, or a structured `scope` of application, node
//! list, and query.

use serde::{Deserialize, Serialize};

/// Caller-facing parameters for one deploy job
///
/// Owned by the caller and consumed once per run.
#[derive(Debug, Clone, Default)]
pub struct JobParams {
    /// Legacy flat target spec; kept for older orchestrator versions.
    /// When non-empty it wins over every scope field.
    pub target: Option<String>,

    /// Explicit node list for the scope
    pub nodes: Vec<String>,

    /// Application name for the scope
    pub application: Option<String>,

    /// Query expression for the scope
    pub query: Option<String>,

    /// Maximum nodes to run concurrently; orchestrator default when absent
    pub concurrency: Option<u64>,

    /// Simulate without applying changes
    pub noop: bool,

    /// Environment to deploy; orchestrator default when absent
    pub environment: Option<String>,
}

/// Body of the deploy command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployCommand {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<DeployScope>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<u64>,

    pub noop: bool,

    /// Serialized even when null; the orchestrator resolves its default
    pub environment: Option<String>,
}

/// Structured node selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployScope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,
}

impl From<JobParams> for DeployCommand {
    fn from(params: JobParams) -> Self {
        let target = non_empty(params.target);

        let scope = if target.is_some() {
            None
        } else {
            let scope = DeployScope {
                query: non_empty(params.query),
                nodes: if params.nodes.is_empty() {
                    None
                } else {
                    Some(params.nodes)
                },
                application: non_empty(params.application),
            };
            if scope.query.is_none() && scope.nodes.is_none() && scope.application.is_none() {
                None
            } else {
                Some(scope)
            }
        };

        DeployCommand {
            target,
            scope,
            concurrency: params.concurrency,
            noop: params.noop,
            environment: params.environment,
        }
    }
}

/// Treats `None` and the empty string alike
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_target_suppresses_scope_fields() {
        let params = JobParams {
            target: Some("web-*".to_string()),
            nodes: vec!["node1.example.com".to_string()],
            application: Some("Shop".to_string()),
            query: Some("inventory {}".to_string()),
            environment: Some("production".to_string()),
            ..Default::default()
        };

        let body = serde_json::to_value(DeployCommand::from(params)).unwrap();
        assert_eq!(
            body,
            json!({
                "target": "web-*",
                "noop": false,
                "environment": "production"
            })
        );
    }

    #[test]
    fn test_scope_collects_non_empty_fields() {
        let params = JobParams {
            nodes: vec!["node1.example.com".to_string(), "node2.example.com".to_string()],
            query: Some("nodes {}".to_string()),
            environment: Some("production".to_string()),
            ..Default::default()
        };

        let body = serde_json::to_value(DeployCommand::from(params)).unwrap();
        assert_eq!(
            body,
            json!({
                "scope": {
                    "query": "nodes {}",
                    "nodes": ["node1.example.com", "node2.example.com"]
                },
                "noop": false,
                "environment": "production"
            })
        );
    }

    #[test]
    fn test_scope_omitted_when_all_fields_empty() {
        let params = JobParams {
            environment: Some("production".to_string()),
            ..Default::default()
        };

        let body = serde_json::to_value(DeployCommand::from(params)).unwrap();
        assert_eq!(body, json!({ "noop": false, "environment": "production" }));
    }

    #[test]
    fn test_empty_target_falls_back_to_scope() {
        let params = JobParams {
            target: Some(String::new()),
            application: Some("Shop".to_string()),
            ..Default::default()
        };

        let body = serde_json::to_value(DeployCommand::from(params)).unwrap();
        assert_eq!(
            body,
            json!({
                "scope": { "application": "Shop" },
                "noop": false,
                "environment": null
            })
        );
    }

    #[test]
    fn test_concurrency_serialized_only_when_set() {
        let params = JobParams {
            target: Some("all".to_string()),
            concurrency: Some(40),
            noop: true,
            ..Default::default()
        };

        let body = serde_json::to_value(DeployCommand::from(params)).unwrap();
        assert_eq!(
            body,
            json!({
                "target": "all",
                "concurrency": 40,
                "noop": true,
                "environment": null
            })
        );
    }

    #[test]
    fn test_environment_serialized_even_when_absent() {
        let body = serde_json::to_value(DeployCommand::from(JobParams::default())).unwrap();
        let map = body.as_object().unwrap();
        assert!(map.contains_key("environment"));
        assert!(map["environment"].is_null());
    }
}
