//! Illustration for finalized content.

use std::sync::Arc;

use async_trait::async_trait;

use super::traits::{CollaboratorError, Illustrator};
use crate::domain::TaskKind;
use crate::image::ImageClient;

/// Tech-style illustration prompt for the given task kind.
pub fn image_prompt(task_kind: TaskKind, aspect_ratio: &str) -> String {
    format!(
        "Create a modern, tech-savvy, professional illustration for {} content. \
         Style: futuristic, clean, minimalist, with vibrant colors. \
         Theme: technology, innovation, digital transformation. \
         Aspect ratio: {}, high quality, professional design.",
        task_kind, aspect_ratio
    )
}

/// Illustrator that renders a prompt through an [`ImageClient`].
pub struct ImageIllustrator {
    images: Arc<dyn ImageClient>,
    aspect_ratio: String,
}

impl ImageIllustrator {
    pub fn new(images: Arc<dyn ImageClient>) -> Self {
        Self {
            images,
            aspect_ratio: crate::image::fal::DEFAULT_ASPECT_RATIO.to_string(),
        }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.aspect_ratio = aspect_ratio.into();
        self
    }
}

#[async_trait]
impl Illustrator for ImageIllustrator {
    async fn illustrate(&self, task_kind: TaskKind, content: &str) -> Result<String, CollaboratorError> {
        log::debug!("Illustrating {} content ({} chars)", task_kind, content.len());
        let url = self.images.generate(&image_prompt(task_kind, &self.aspect_ratio)).await?;
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{ImageError, MockImageClient};

    struct BrokenImages;

    #[async_trait]
    impl ImageClient for BrokenImages {
        async fn generate(&self, _prompt: &str) -> Result<String, ImageError> {
            Err(ImageError::NoImage)
        }
    }

    #[test]
    fn test_image_prompt() {
        let prompt = image_prompt(TaskKind::Cv, "16:9");
        assert!(prompt.contains("illustration for cv content"));
        assert!(prompt.contains("Aspect ratio: 16:9"));
    }

    #[tokio::test]
    async fn test_illustrate_returns_url() {
        let illustrator = ImageIllustrator::new(Arc::new(MockImageClient::new()));
        let url = illustrator.illustrate(TaskKind::Brief, "content").await.unwrap();
        assert_eq!(url, MockImageClient::PLACEHOLDER_URL);
    }

    #[tokio::test]
    async fn test_illustrate_failure() {
        let illustrator = ImageIllustrator::new(Arc::new(BrokenImages)).with_aspect_ratio("1:1");
        let err = illustrator.illustrate(TaskKind::Brief, "content").await.unwrap_err();
        assert!(matches!(err, CollaboratorError::Image(ImageError::NoImage)));
    }
}
