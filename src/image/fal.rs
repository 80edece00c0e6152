//! fal.ai image generation client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use super::{ImageClient, ImageError};

const FAL_RUN_URL: &str = "https://fal.run";

/// Default model
pub const DEFAULT_MODEL: &str = "fal-ai/flux/schnell";

/// Default aspect ratio
pub const DEFAULT_ASPECT_RATIO: &str = "4:3";

/// Default environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "FAL_KEY";

/// Configuration for the fal.ai client
#[derive(Debug, Clone)]
pub struct FalConfig {
    pub model: String,
    pub aspect_ratio: String,
    pub timeout: Duration,
}

impl Default for FalConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Synchronous-run fal.ai client
pub struct FalClient {
    client: Client,
    api_key: String,
    config: FalConfig,
}

impl FalClient {
    /// Create a client reading the API key from `api_key_env`
    pub fn from_env(api_key_env: &str, config: FalConfig) -> Result<Self, ImageError> {
        let api_key = std::env::var(api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ImageError::MissingApiKey {
                env_var: api_key_env.to_string(),
            })?;

        Self::with_api_key(api_key, config)
    }

    pub fn with_api_key(api_key: impl Into<String>, config: FalConfig) -> Result<Self, ImageError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/{}", FAL_RUN_URL, self.config.model.trim_matches('/'))
    }

    fn build_request(&self, prompt: &str) -> Value {
        json!({
            "prompt": prompt,
            "aspect_ratio": self.config.aspect_ratio,
            "num_images": 1
        })
    }
}

/// Pull the image URL out of a fal.ai response.
///
/// Accepts `{"images": [{"url": ...}]}`, `{"images": ["..."]}`, a top-level
/// `{"url": ...}` or a bare string.
fn extract_image_url(body: &Value) -> Option<String> {
    if let Some(url) = body.as_str() {
        return non_empty(url);
    }

    if let Some(first) = body.get("images").and_then(Value::as_array).and_then(|a| a.first()) {
        let url = match first {
            Value::String(s) => non_empty(s),
            other => other.get("url").and_then(Value::as_str).and_then(non_empty),
        };
        if url.is_some() {
            return url;
        }
    }

    body.get("url").and_then(Value::as_str).and_then(non_empty)
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() { None } else { Some(s.to_string()) }
}

#[async_trait]
impl ImageClient for FalClient {
    async fn generate(&self, prompt: &str) -> Result<String, ImageError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Key {}", self.api_key))
            .json(&self.build_request(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ImageError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response.json().await?;
        extract_image_url(&body).ok_or(ImageError::NoImage)
    }
}
