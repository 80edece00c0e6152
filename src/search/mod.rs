//! Web search used by the content generators.
//!
//! - SearchClient trait
//! - TavilyClient for the live API
//! - MockSearchClient for offline runs
//! - FallbackSearch: live client that degrades to the mock on auth failures

pub mod tavily;

use async_trait::async_trait;

pub use tavily::TavilyClient;

/// Errors from search operations.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Search API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Missing API key: environment variable {env_var} not set")]
    MissingApiKey { env_var: String },
}

impl SearchError {
    /// Whether the failure is an authorization problem (bad or revoked key).
    pub fn is_unauthorized(&self) -> bool {
        match self {
            SearchError::Api { status, message } => {
                let lower = message.to_lowercase();
                *status == 401 || *status == 403 || lower.contains("invalid api key") || lower.contains("unauthorized")
            }
            SearchError::MissingApiKey { .. } => true,
            SearchError::Network(_) => false,
        }
    }
}

/// Search backend returning cleaned plain-text summaries.
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<String, SearchError>;
}

/// Deterministic offline search results.
#[derive(Debug, Clone, Default)]
pub struct MockSearchClient;

impl MockSearchClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SearchClient for MockSearchClient {
    async fn search(&self, query: &str, _max_results: usize) -> Result<String, SearchError> {
        Ok(mock_results(query))
    }
}

fn mock_results(query: &str) -> String {
    format!(
        "[1] AI Industry News - {query}\n\
         Source: https://example.com/ai-news\n\
         Summary: This is a mock search result for testing purposes. The query was: {query}.\n\n\
         [2] Technology Trends - {query}\n\
         Source: https://example.com/tech-trends\n\
         Summary: Mock data for demonstration. Set TAVILY_API_KEY to get real search results."
    )
}

/// Live search that falls back to mock results when the key is rejected.
///
/// Any other failure (network, 5xx, bad request) propagates.
pub struct FallbackSearch<S: SearchClient> {
    live: S,
    mock: MockSearchClient,
}

impl<S: SearchClient> FallbackSearch<S> {
    pub fn new(live: S) -> Self {
        Self {
            live,
            mock: MockSearchClient::new(),
        }
    }
}

#[async_trait]
impl<S: SearchClient> SearchClient for FallbackSearch<S> {
    async fn search(&self, query: &str, max_results: usize) -> Result<String, SearchError> {
        match self.live.search(query, max_results).await {
            Ok(text) => Ok(text),
            Err(e) if e.is_unauthorized() => {
                log::warn!("Search rejected credentials ({}), using mock results", e);
                self.mock.search(query, max_results).await
            }
            Err(e) => Err(e),
        }
    }
}
