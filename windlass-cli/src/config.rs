//! CLI configuration
//!
//! Resolves the orchestrator host and authentication token from the
//! command line, the environment, or a token file. Credential stores
//! are out of scope; the token arrives here already resolved.

use std::path::PathBuf;

use anyhow::Context;

/// Resolved CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Orchestrator host
    pub host: String,

    /// Authentication token, sent as `X-Authentication`
    pub token: String,
}

impl Config {
    /// Resolves the token from the flag/env value or a token file
    pub fn resolve(
        host: String,
        token: Option<String>,
        token_file: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let token = match (token, token_file) {
            (Some(token), _) => token,
            (None, Some(path)) => std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read token file {}", path.display()))?
                .trim()
                .to_string(),
            (None, None) => anyhow::bail!(
                "no authentication token: pass --token, set WINDLASS_TOKEN, or pass --token-file"
            ),
        };

        Ok(Self { host, token })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.host.is_empty() {
            anyhow::bail!("host cannot be empty");
        }

        if self.token.is_empty() {
            anyhow::bail!("token cannot be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_explicit_token() {
        let config = Config::resolve(
            "pe.example.com".to_string(),
            Some("tok".to_string()),
            None,
        )
        .unwrap();
        assert_eq!(config.token, "tok");
    }

    #[test]
    fn test_resolve_reads_and_trims_token_file() {
        let dir = std::env::temp_dir().join("windlass-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("token");
        std::fs::write(&path, "file-token\n").unwrap();

        let config =
            Config::resolve("pe.example.com".to_string(), None, Some(path)).unwrap();
        assert_eq!(config.token, "file-token");
    }

    #[test]
    fn test_resolve_requires_some_token_source() {
        assert!(Config::resolve("pe.example.com".to_string(), None, None).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_values() {
        let config = Config {
            host: String::new(),
            token: "tok".to_string(),
        };
        assert!(config.validate().is_err());

        let config = Config {
            host: "pe.example.com".to_string(),
            token: String::new(),
        };
        assert!(config.validate().is_err());
    }
}
