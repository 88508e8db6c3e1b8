//! Two-stage citation resolution.
//!
//! The export-format file is only reachable through a transient, result-scoped
//! URL embedded in a search-results page; there is no stable per-article export
//! endpoint. Resolution therefore fetches the results page, locates the first
//! embedded export link, fetches that link, and returns its body verbatim
//! (trimmed). The resolver holds no state between calls and performs no
//! retries; a failed attempt is surfaced immediately for the user to re-trigger.

mod extract;
mod fetch;

pub use fetch::{FetchError, FetchResponse, Fetcher, HttpFetcher};

use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::models::LookupRequest;

/// Default search endpoint for free-text queries.
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://scholar.google.com/scholar";

/// Substring identifying a citation-export link on the results page.
pub const DEFAULT_EXPORT_LINK_PATTERN: &str = "scholar.bib";

/// Browser-like identification sent with the results-page fetch.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// How to treat a payload that is empty after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyPayloadPolicy {
    /// Hand the empty payload back as a success.
    #[default]
    Allow,
    /// Treat an empty payload as a failed resolution.
    Reject,
}

/// Resolver tuning knobs.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Endpoint free-text queries are encoded into.
    pub search_endpoint: String,

    /// Substring a results-page anchor destination must carry to count as an
    /// export link.
    pub export_link_pattern: String,

    /// `User-Agent` sent with the results-page fetch. The export fetch carries
    /// no custom headers.
    pub user_agent: String,

    /// Budget for the results-page fetch.
    pub results_timeout: Duration,

    /// Budget for the export fetch.
    pub export_timeout: Duration,

    /// Policy for payloads that trim to nothing.
    pub empty_payload: EmptyPayloadPolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            export_link_pattern: DEFAULT_EXPORT_LINK_PATTERN.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            results_timeout: Duration::from_secs(10),
            export_timeout: Duration::from_secs(8),
            empty_payload: EmptyPayloadPolicy::Allow,
        }
    }
}

/// Errors from a resolution attempt. All are terminal for the triggering flow.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Results page unreachable: non-2xx status, network failure, or timeout.
    #[error("failed to access search results: {0}")]
    Access(String),

    /// Results page loaded but carried no citation-export link.
    #[error("no citation export link found on results page")]
    NoExportLink,

    /// Export link unreachable: non-2xx status, network failure, or timeout.
    #[error("failed to fetch citation export: {0}")]
    ExportFetch(String),

    /// Payload trimmed to nothing under [`EmptyPayloadPolicy::Reject`].
    #[error("citation export was empty")]
    EmptyPayload,
}

/// Stateless, reentrant two-stage citation resolver.
#[derive(Debug, Clone)]
pub struct CitationResolver {
    fetcher: Arc<dyn Fetcher>,
    config: ResolverConfig,
}

impl CitationResolver {
    /// Create a resolver with the default configuration.
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self::with_config(fetcher, ResolverConfig::default())
    }

    /// Create a resolver with a custom configuration.
    pub fn with_config(fetcher: Arc<dyn Fetcher>, config: ResolverConfig) -> Self {
        Self { fetcher, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a request to the citation text.
    ///
    /// The export fetch is only attempted once the results page has loaded and
    /// yielded an export link; an access failure or a missing link ends the
    /// flow with a single request made.
    pub async fn resolve(&self, request: &LookupRequest) -> Result<String, ResolveError> {
        let results_url = self.results_url(request);
        tracing::debug!(url = %results_url, "fetching results page");

        let results = timeout(
            self.config.results_timeout,
            self.fetcher.get(&results_url, Some(&self.config.user_agent)),
        )
        .await
        .map_err(|_| ResolveError::Access("timed out".to_string()))?
        .map_err(|e| ResolveError::Access(e.to_string()))?;

        if !results.is_success() {
            tracing::warn!(status = results.status, "results page fetch failed");
            return Err(ResolveError::Access(format!("status {}", results.status)));
        }

        let href = extract::find_export_link(&results.body, &self.config.export_link_pattern)
            .ok_or(ResolveError::NoExportLink)?;
        let export_url = absolutize(&href, &results_url);
        tracing::debug!(url = %export_url, "fetching citation export");

        let export = timeout(
            self.config.export_timeout,
            self.fetcher.get(&export_url, None),
        )
        .await
        .map_err(|_| ResolveError::ExportFetch("timed out".to_string()))?
        .map_err(|e| ResolveError::ExportFetch(e.to_string()))?;

        if !export.is_success() {
            tracing::warn!(status = export.status, "export fetch failed");
            return Err(ResolveError::ExportFetch(format!(
                "status {}",
                export.status
            )));
        }

        let payload = export.body.trim().to_string();
        if payload.is_empty() && self.config.empty_payload == EmptyPayloadPolicy::Reject {
            return Err(ResolveError::EmptyPayload);
        }

        Ok(payload)
    }

    fn results_url(&self, request: &LookupRequest) -> String {
        match request {
            LookupRequest::DirectLink { url } => url.clone(),
            LookupRequest::FreeTextQuery { text } => format!(
                "{}?q={}&hl=en",
                self.config.search_endpoint,
                urlencoding::encode(text)
            ),
        }
    }
}

/// Resolve a possibly-relative export href against the results-page URL.
///
/// Browsers hand scripts pre-resolved absolute URLs; a parsed document does
/// not, so relative hrefs are joined here before the second fetch.
fn absolutize(href: &str, base: &str) -> String {
    match url::Url::parse(base).and_then(|base| base.join(href)) {
        Ok(joined) => joined.to_string(),
        Err(_) => href.to_string(),
    }
}
