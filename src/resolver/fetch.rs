//! HTTP fetch seam for the resolver.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// A plain GET response: status code plus the decoded body text.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    /// Whether the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Errors from the fetch layer.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connection failure, DNS failure, or a broken transfer.
    #[error("network error: {0}")]
    Network(String),

    /// The underlying client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

/// Outbound GET capability, injected so callers run without a real network.
///
/// Implementations perform a single plain GET with no body. Timeouts are the
/// caller's concern; a fetch may be awaited for as long as the caller allows.
#[async_trait]
pub trait Fetcher: Send + Sync + std::fmt::Debug {
    /// Perform a GET, optionally carrying a custom `User-Agent` header.
    async fn get(&self, url: &str, user_agent: Option<&str>)
        -> Result<FetchResponse, FetchError>;
}

/// Shared reqwest-backed fetcher with sensible defaults.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Arc<Client>,
}

impl HttpFetcher {
    /// Create a new fetcher with default settings.
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| FetchError::Build(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Create from an existing reqwest Client.
    pub fn from_client(client: Arc<Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(
        &self,
        url: &str,
        user_agent: Option<&str>,
    ) -> Result<FetchResponse, FetchError> {
        let mut request = self.client.get(url);
        if let Some(agent) = user_agent {
            request = request.header(reqwest::header::USER_AGENT, agent);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(FetchResponse { status, body })
    }
}
