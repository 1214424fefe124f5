//! Normalized orchestrator responses
//!
//! Every transport exchange is reduced to an [`ApiResponse`]: the HTTP
//! status code plus the parsed JSON body. The accessors here replace
//! free-form traversal of that body with typed lookups that report the
//! offending field path on failure.

use serde_json::Value;
use thiserror::Error;

/// A (status code, parsed body) pair returned by the transport
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,

    /// Parsed response body; `Null` for empty bodies, `String` for
    /// payloads that were not JSON
    pub body: Value,
}

/// A response body that does not have the expected shape
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BodyError {
    /// A required field is absent
    #[error("response body is missing `{path}`")]
    MissingField { path: String },

    /// A field is present but not of the expected type
    #[error("response body field `{path}` is not a {expected}")]
    WrongType {
        path: String,
        expected: &'static str,
    },
}

impl BodyError {
    pub fn missing(path: impl Into<String>) -> Self {
        Self::MissingField { path: path.into() }
    }

    pub fn wrong_type(path: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongType {
            path: path.into(),
            expected,
        }
    }
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Uniform success rule applied to every orchestrator response
    ///
    /// A response succeeds when its status code is in [200, 300) and the
    /// body, if it is a mapping, carries no non-null `error` key. The
    /// same predicate covers submission, status-poll, and node-fetch
    /// responses; distinguishing failure shapes is left to the caller.
    pub fn is_success(&self) -> bool {
        if self.status < 200 || self.status >= 300 {
            return false;
        }

        match self.body.get("error") {
            Some(error) => error.is_null(),
            None => true,
        }
    }

    /// Extracts the most useful rejection message from a failed response
    ///
    /// Priority: an `error` field (stringified whatever its shape), then
    /// a `msg` field, then a synthesized environment-not-found message
    /// for 404s, then a generic fallback naming the status code.
    pub fn rejection_message(&self, environment: Option<&str>) -> String {
        if let Some(error) = self.body.get("error") {
            if !error.is_null() {
                return stringify(error);
            }
        }

        if let Some(msg) = self.body.get("msg").and_then(Value::as_str) {
            return msg.to_string();
        }

        // The orchestrator answers 404 when the environment does not exist.
        if self.status == 404 {
            return match environment {
                Some(name) => format!("Environment {} not found", name),
                None => "Environment not found".to_string(),
            };
        }

        format!("Orchestrator rejected the request with status {}", self.status)
    }

    /// Reads the job id from a submission response body (`job.id`)
    pub fn job_id(&self) -> Result<String, BodyError> {
        let job = self
            .body
            .get("job")
            .ok_or_else(|| BodyError::missing("job"))?;
        let id = job
            .get("id")
            .ok_or_else(|| BodyError::missing("job.id"))?;
        Ok(str_value(id, "job.id")?.to_string())
    }

    /// Reads the latest state word from a status response body
    ///
    /// The `status` key holds the job's status history; only the last
    /// entry is authoritative.
    pub fn latest_state(&self) -> Result<String, BodyError> {
        let history = self
            .body
            .get("status")
            .ok_or_else(|| BodyError::missing("status"))?
            .as_array()
            .ok_or_else(|| BodyError::wrong_type("status", "list"))?;
        let latest = history
            .last()
            .ok_or_else(|| BodyError::missing("status[last]"))?;
        let state = latest
            .get("state")
            .ok_or_else(|| BodyError::missing("status[last].state"))?;
        Ok(str_value(state, "status[last].state")?.to_string())
    }
}

/// Renders an error value for humans: strings verbatim, everything else
/// as compact JSON
pub(crate) fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Reads a string field, reporting `path` on type mismatch
pub(crate) fn str_value<'a>(value: &'a Value, path: &str) -> Result<&'a str, BodyError> {
    value
        .as_str()
        .ok_or_else(|| BodyError::wrong_type(path, "string"))
}

/// Reads a count field, truncating the float encoding some orchestrator
/// versions emit (`3.0` means 3)
pub(crate) fn count_value(value: &Value, path: &str) -> Result<u64, BodyError> {
    let number = value
        .as_number()
        .ok_or_else(|| BodyError::wrong_type(path, "number"))?;

    if let Some(count) = number.as_u64() {
        return Ok(count);
    }

    number
        .as_f64()
        .map(|f| f as u64)
        .ok_or_else(|| BodyError::wrong_type(path, "number"))
}
