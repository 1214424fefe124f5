//! HTTP transport seam
//!
//! The client and run loop only ever see the [`Transport`] trait: one
//! `send` that returns a normalized (status code, parsed body) pair.
//! [`HttpTransport`] is the reqwest implementation; tests substitute
//! scripted in-memory transports.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use windlass_core::dto::response::ApiResponse;

/// HTTP methods the orchestrator protocol uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// A transport exchange that never completed
///
/// Transport failures are not domain errors: they propagate as-is and
/// are never retried here.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or the response not read
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// The external request/response collaborator
///
/// Implementations must be safe to call repeatedly and concurrently;
/// independent invocations may share one transport.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one HTTP exchange against the orchestrator host
    async fn send(
        &self,
        method: Method,
        path: &str,
        port: u16,
        body: Option<&Value>,
    ) -> Result<ApiResponse, TransportError>;
}

/// reqwest-backed transport
///
/// Authenticates every request with the `X-Authentication` header and
/// reduces every response to an [`ApiResponse`]: JSON bodies parsed,
/// non-JSON payloads kept as strings, empty bodies as null.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// Scheme plus host, no port and no trailing slash
    base: String,
    token: String,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport for the given orchestrator host
    ///
    /// The host may name a scheme (`https://pe.example.com`); a bare
    /// hostname defaults to https.
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(host, token, reqwest::Client::new())
    }

    /// Creates a transport with a caller-configured reqwest client
    ///
    /// Use this to tune timeouts, proxies, or TLS; the transport itself
    /// never touches those settings.
    pub fn with_client(
        host: impl Into<String>,
        token: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        let host = host.into();
        let trimmed = host.trim_end_matches('/');
        let base = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };

        Self {
            base,
            token: token.into(),
            client,
        }
    }

    /// The normalized base URL (scheme and host, no port)
    pub fn base(&self) -> &str {
        &self.base
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        path: &str,
        port: u16,
        body: Option<&Value>,
    ) -> Result<ApiResponse, TransportError> {
        let url = format!("{}:{}{}", self.base, port, path);
        debug!(%method, %url, "sending orchestrator request");

        let mut request = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        }
        .header("X-Authentication", &self.token);

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        debug!(status, "orchestrator response received");
        Ok(ApiResponse::new(status, body))
    }
}
