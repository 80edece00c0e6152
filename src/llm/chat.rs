//! OpenAI-compatible chat completions client
//!
//! Speaks the `/chat/completions` dialect used by DeepSeek and most hosted
//! model gateways.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::llm::client::{CompletionRequest, CompletionResponse, LlmClient, LlmError, Role, TokenUsage};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";

/// Default model to use
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Default environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "DEEPSEEK_API_KEY";

/// Configuration for the chat completions client
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl ChatConfig {
    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Chat completions API client
pub struct ChatCompletionsClient {
    client: Client,
    api_key: String,
    config: ChatConfig,
}

impl ChatCompletionsClient {
    /// Create a client reading the API key from `api_key_env`
    pub fn from_env(api_key_env: &str, config: ChatConfig) -> Result<Self, LlmError> {
        let api_key = std::env::var(api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::MissingApiKey {
                env_var: api_key_env.to_string(),
            })?;

        Self::with_api_key(api_key, config)
    }

    /// Create a client with an explicit API key
    pub fn with_api_key(api_key: impl Into<String>, config: ChatConfig) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Build the request body
    fn build_request(&self, request: &CompletionRequest) -> Value {
        let mut messages: Vec<Value> = Vec::with_capacity(request.messages.len() + 1);

        if !request.system_prompt.is_empty() {
            messages.push(json!({
                "role": Role::System,
                "content": request.system_prompt
            }));
        }

        messages.extend(request.messages.iter().map(|m| {
            json!({
                "role": m.role,
                "content": m.content
            })
        }));

        json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
            "stream": false
        })
    }

    /// Send a request and return the raw JSON body
    async fn send_request(&self, body: Value) -> Result<Value, LlmError> {
        let response = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        // Handle rate limiting
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            });
        }

        // Handle other errors
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: TokenUsage,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Parse the API response into a CompletionResponse
fn parse_response(body: Value, fallback_model: &str) -> Result<CompletionResponse, LlmError> {
    let parsed: ChatResponse = serde_json::from_value(body)?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))?;

    Ok(CompletionResponse {
        content,
        model: parsed.model.unwrap_or_else(|| fallback_model.to_string()),
        usage: parsed.usage,
    })
}

#[async_trait]
impl LlmClient for ChatCompletionsClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.build_request(&request);
        let raw = self.send_request(body).await?;
        let response = parse_response(raw, &self.config.model)?;
        log::debug!(
            "LLM {} responded with {} chars ({} tokens)",
            response.model,
            response.content.len(),
            response.usage.total()
        );
        Ok(response)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

impl std::fmt::Debug for ChatCompletionsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish()
    }
}
