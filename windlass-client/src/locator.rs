//! Job-id resolution
//!
//! Older orchestrator API versions return a relative job id (`"42"`)
//! from the deploy command while newer ones return a full URL. Both
//! forms must keep working, so the id is parsed into an explicit
//! two-variant locator: a failed absolute-URL parse selects the legacy
//! relative form rather than raising an error.

use url::Url;

/// Default orchestrator service port
pub const ORCHESTRATOR_PORT: u16 = 8143;

/// Where to poll a submitted job
#[derive(Debug, Clone, PartialEq)]
pub enum JobLocator {
    /// Legacy relative id, polled on the default port
    Relative(String),

    /// Full job URL as returned by newer orchestrator versions
    Absolute(Url),
}

impl JobLocator {
    /// Classifies a job id returned by the deploy command
    ///
    /// URL parse failure is format detection, not an error condition.
    pub fn parse(id: &str) -> Self {
        match Url::parse(id) {
            Ok(url) => JobLocator::Absolute(url),
            Err(_) => JobLocator::Relative(id.to_string()),
        }
    }

    /// Request path for status polls
    pub fn status_path(&self) -> String {
        match self {
            JobLocator::Relative(id) => format!("/orchestrator/v1/{}", id),
            JobLocator::Absolute(url) => url.path().to_string(),
        }
    }

    /// Request port for status polls
    pub fn port(&self) -> u16 {
        match self {
            JobLocator::Relative(_) => ORCHESTRATOR_PORT,
            JobLocator::Absolute(url) => url.port().unwrap_or(ORCHESTRATOR_PORT),
        }
    }

    /// Short job id: the final path segment, used for the nodes fetch
    /// and for log lines
    pub fn short_id(&self) -> &str {
        let path = match self {
            JobLocator::Relative(id) => id.as_str(),
            JobLocator::Absolute(url) => url.path(),
        };
        path.rsplit('/').next().unwrap_or(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_id_uses_fixed_path_and_port() {
        let locator = JobLocator::parse("42");
        assert_eq!(locator, JobLocator::Relative("42".to_string()));
        assert_eq!(locator.status_path(), "/orchestrator/v1/42");
        assert_eq!(locator.port(), 8143);
        assert_eq!(locator.short_id(), "42");
    }

    #[test]
    fn test_absolute_url_uses_its_path_and_port() {
        let locator = JobLocator::parse("https://host:9000/orchestrator/v1/42");
        assert!(matches!(locator, JobLocator::Absolute(_)));
        assert_eq!(locator.status_path(), "/orchestrator/v1/42");
        assert_eq!(locator.port(), 9000);
        assert_eq!(locator.short_id(), "42");
    }

    #[test]
    fn test_absolute_url_without_port_defaults() {
        let locator = JobLocator::parse("https://pe.example.com/orchestrator/v1/jobs/7");
        assert_eq!(locator.port(), 8143);
        assert_eq!(locator.status_path(), "/orchestrator/v1/jobs/7");
        assert_eq!(locator.short_id(), "7");
    }

    #[test]
    fn test_relative_path_keeps_its_segments() {
        let locator = JobLocator::parse("jobs/42");
        assert_eq!(locator.status_path(), "/orchestrator/v1/jobs/42");
        assert_eq!(locator.short_id(), "42");
    }
}
