//! Code-manager deploy DTOs
//!
//! Body and response parsing for the code-manager deploy endpoint. The
//! command always waits for the deploy to finish, so the response carries
//! one final outcome per requested environment.

use serde::{Deserialize, Serialize};

use crate::dto::response::{ApiResponse, BodyError, str_value, stringify};

/// Body of the code-manager deploy request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeDeployCommand {
    pub environments: Vec<String>,

    /// Always true: the response must carry final outcomes, not queue
    /// acknowledgements
    pub wait: bool,
}

impl CodeDeployCommand {
    pub fn new(environments: Vec<String>) -> Self {
        Self {
            environments,
            wait: true,
        }
    }
}

/// Final outcome of one environment's code deploy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeployOutcome {
    pub environment: String,

    /// Deploy status word; `complete` on success
    pub status: Option<String>,

    /// Stringified error value, when the code manager reported one
    pub error: Option<String>,
}

impl DeployOutcome {
    /// Whether this environment's deploy did not succeed
    pub fn is_failure(&self) -> bool {
        if self.error.is_some() {
            return true;
        }
        !matches!(
            self.status.as_deref(),
            Some("complete") | Some("queued") | Some("deploying")
        )
    }

    /// One-line summary for failure listings
    pub fn describe(&self) -> String {
        match (&self.status, &self.error) {
            (_, Some(error)) => format!("{}: {}", self.environment, error),
            (Some(status), None) => format!("{}: {}", self.environment, status),
            (None, None) => format!("{}: no status reported", self.environment),
        }
    }
}

/// Parses the code-manager deploy response into per-environment outcomes
///
/// The body is a list with one entry per requested environment.
pub fn deploy_outcomes(response: &ApiResponse) -> Result<Vec<DeployOutcome>, BodyError> {
    let items = response
        .body
        .as_array()
        .ok_or_else(|| BodyError::wrong_type("deploys", "list"))?;

    let mut outcomes = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let path = format!("deploys[{}].environment", index);
        let environment = str_value(
            item.get("environment")
                .ok_or_else(|| BodyError::missing(path.clone()))?,
            &path,
        )?
        .to_string();

        let status = item
            .get("status")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);

        let error = item
            .get("error")
            .filter(|e| !e.is_null())
            .map(stringify);

        outcomes.push(DeployOutcome {
            environment,
            status,
            error,
        });
    }

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_body_shape() {
        let body = serde_json::to_value(CodeDeployCommand::new(vec![
            "production".to_string(),
        ]))
        .unwrap();
        assert_eq!(body, json!({"environments": ["production"], "wait": true}));
    }

    #[test]
    fn test_deploy_outcomes_parses_each_environment() {
        let response = ApiResponse::new(
            200,
            json!([
                {"environment": "production", "status": "complete", "id": 7},
                {"environment": "staging", "status": "failed",
                 "error": {"kind": "code-manager/deploy-failure"}}
            ]),
        );

        let outcomes = deploy_outcomes(&response).unwrap();
        assert_eq!(outcomes.len(), 2);

        assert_eq!(outcomes[0].environment, "production");
        assert!(!outcomes[0].is_failure());

        assert_eq!(outcomes[1].environment, "staging");
        assert!(outcomes[1].is_failure());
        assert_eq!(
            outcomes[1].error.as_deref(),
            Some(r#"{"kind":"code-manager/deploy-failure"}"#)
        );
    }

    #[test]
    fn test_outcome_without_recognized_status_is_failure() {
        let outcome = DeployOutcome {
            environment: "nosuchenv".to_string(),
            status: Some("failed".to_string()),
            error: None,
        };
        assert!(outcome.is_failure());

        let outcome = DeployOutcome {
            environment: "nosuchenv".to_string(),
            status: None,
            error: None,
        };
        assert!(outcome.is_failure());
    }

    #[test]
    fn test_queued_and_deploying_are_not_failures() {
        for status in ["queued", "deploying"] {
            let outcome = DeployOutcome {
                environment: "production".to_string(),
                status: Some(status.to_string()),
                error: None,
            };
            assert!(!outcome.is_failure());
        }
    }

    #[test]
    fn test_deploy_outcomes_rejects_non_list_body() {
        let response = ApiResponse::new(200, json!({"status": "complete"}));
        assert_eq!(
            deploy_outcomes(&response).unwrap_err(),
            BodyError::wrong_type("deploys", "list")
        );
    }

    #[test]
    fn test_deploy_outcomes_names_missing_environment() {
        let response = ApiResponse::new(200, json!([{"status": "complete"}]));
        assert_eq!(
            deploy_outcomes(&response).unwrap_err(),
            BodyError::missing("deploys[0].environment")
        );
    }

    #[test]
    fn test_describe_prefers_error_over_status() {
        let outcome = DeployOutcome {
            environment: "staging".to_string(),
            status: Some("failed".to_string()),
            error: Some("environment not found".to_string()),
        };
        assert_eq!(outcome.describe(), "staging: environment not found");
    }
}
