//! Report assembly
//!
//! Merges the final status response with the node-list response into a
//! [`JobReport`]. Counts may arrive float-encoded from the orchestrator
//! and are truncated to integers on the way in.

use serde_json::Value;

use crate::domain::job::JobState;
use crate::domain::report::{JobReport, NodeMetrics, NodeReport};
use crate::dto::response::{ApiResponse, BodyError, count_value, str_value};

/// Builds the final report from the last status response and the
/// node-list response
pub fn build_report(
    status: &ApiResponse,
    nodes: &ApiResponse,
    state: JobState,
) -> Result<JobReport, BodyError> {
    let name = str_value(
        status
            .body
            .get("name")
            .ok_or_else(|| BodyError::missing("name"))?,
        "name",
    )?
    .to_string();

    let environment = status
        .body
        .get("environment")
        .ok_or_else(|| BodyError::missing("environment"))?
        .get("name")
        .ok_or_else(|| BodyError::missing("environment.name"))?;
    let environment = str_value(environment, "environment.name")?.to_string();

    let node_count = count_value(
        status
            .body
            .get("node_count")
            .ok_or_else(|| BodyError::missing("node_count"))?,
        "node_count",
    )?;

    let items = nodes
        .body
        .get("items")
        .ok_or_else(|| BodyError::missing("items"))?
        .as_array()
        .ok_or_else(|| BodyError::wrong_type("items", "list"))?;

    let mut node_reports = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        node_reports.push(node_report(item, index)?);
    }

    Ok(JobReport {
        name,
        state,
        environment,
        node_count,
        nodes: node_reports,
    })
}

fn node_report(item: &Value, index: usize) -> Result<NodeReport, BodyError> {
    let name_path = format!("items[{}].name", index);
    let name = str_value(
        item.get("name")
            .ok_or_else(|| BodyError::missing(name_path.clone()))?,
        &name_path,
    )?
    .to_string();

    let details = item
        .get("details")
        .ok_or_else(|| BodyError::missing(format!("items[{}].details", index)))?;

    let metrics = match details.get("metrics").filter(|m| !m.is_null()) {
        Some(raw) => Some(node_metrics(raw, details, index)?),
        None => None,
    };

    // A message is always present on the wire, but it only carries
    // information when the run never produced metrics.
    let message = if metrics.is_none() {
        details
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
    } else {
        None
    };

    Ok(NodeReport {
        name,
        metrics,
        message,
    })
}

fn node_metrics(raw: &Value, details: &Value, index: usize) -> Result<NodeMetrics, BodyError> {
    let count = |key: &str| -> Result<u64, BodyError> {
        let path = format!("items[{}].details.metrics.{}", index, key);
        count_value(
            raw.get(key).ok_or_else(|| BodyError::missing(path.clone()))?,
            &path,
        )
    };

    // Orchestrator versions that predate corrective-change tracking omit
    // the key entirely.
    let corrective = match raw.get("corrective_change").filter(|v| !v.is_null()) {
        Some(value) => Some(count_value(
            value,
            &format!("items[{}].details.metrics.corrective_change", index),
        )?),
        None => None,
    };

    Ok(NodeMetrics {
        failed: count("failed")?,
        changed: count("changed")?,
        skipped: count("skipped")?,
        corrective,
        report_url: details
            .get("report-url")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}
