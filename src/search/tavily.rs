//! Tavily web search client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{SearchClient, SearchError};

const TAVILY_API_URL: &str = "https://api.tavily.com/search";

/// Default environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "TAVILY_API_KEY";

/// Summaries are cut to this many characters.
const MAX_SUMMARY_CHARS: usize = 500;

/// Tavily search API client
pub struct TavilyClient {
    client: Client,
    api_key: String,
}

impl TavilyClient {
    /// Create a client reading the API key from `api_key_env`
    pub fn from_env(api_key_env: &str, timeout: Duration) -> Result<Self, SearchError> {
        let api_key = std::env::var(api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| SearchError::MissingApiKey {
                env_var: api_key_env.to_string(),
            })?;

        Self::with_api_key(api_key, timeout)
    }

    pub fn with_api_key(api_key: impl Into<String>, timeout: Duration) -> Result<Self, SearchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

/// Render search hits as numbered plain-text blocks.
fn format_results(query: &str, results: &[TavilyResult]) -> String {
    if results.is_empty() {
        return format!("No search results found for '{}'.", query);
    }

    results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let clean = r.content.split_whitespace().collect::<Vec<_>>().join(" ");
            let summary: String = clean.chars().take(MAX_SUMMARY_CHARS).collect();
            format!(
                "[{}] {}\nSource: {}\nSummary: {}...",
                i + 1,
                r.title.as_deref().unwrap_or("Untitled"),
                r.url,
                summary
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[async_trait]
impl SearchClient for TavilyClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<String, SearchError> {
        let body = json!({
            "api_key": self.api_key,
            "query": query,
            "max_results": max_results,
            "search_depth": "advanced"
        });

        let response = self.client.post(TAVILY_API_URL).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: TavilyResponse = response.json().await?;
        log::debug!("Tavily returned {} results for '{}'", parsed.results.len(), query);
        Ok(format_results(query, &parsed.results))
    }
}
