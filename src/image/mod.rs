//! Image generation used by the illustrator.

pub mod fal;

use async_trait::async_trait;

pub use fal::{FalClient, FalConfig};

/// Errors from image generation.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Image API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Missing API key: environment variable {env_var} not set")]
    MissingApiKey { env_var: String },

    #[error("Image generation returned no image URL")]
    NoImage,
}

/// Backend turning a prompt into an image URL.
#[async_trait]
pub trait ImageClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ImageError>;
}

/// Offline image client returning a fixed placeholder URL.
#[derive(Debug, Clone, Default)]
pub struct MockImageClient;

impl MockImageClient {
    pub const PLACEHOLDER_URL: &'static str = "https://placehold.co/800x600?text=quillr";

    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImageClient for MockImageClient {
    async fn generate(&self, _prompt: &str) -> Result<String, ImageError> {
        Ok(Self::PLACEHOLDER_URL.to_string())
    }
}
