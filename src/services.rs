//! Service wiring - builds the external clients and the workflow from config.
//!
//! A missing LLM or search key degrades to the mock client with a warning.
//! A missing image key is an error unless the run is offline.

use std::sync::Arc;

use eyre::{Context, Result};
use log::{info, warn};

use crate::agents::{BriefGenerator, CvGenerator, ImageIllustrator, LlmRefiner, LlmReviewer};
use crate::config::Config;
use crate::image::{FalClient, FalConfig, ImageClient, MockImageClient};
use crate::llm::{ChatCompletionsClient, ChatConfig, LlmClient, LlmError, MockLlmClient};
use crate::search::{FallbackSearch, MockSearchClient, SearchClient, SearchError, TavilyClient};
use crate::workflow::{Dispatcher, Workflow};

/// Which backend each service ended up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Backends {
    pub mock_llm: bool,
    pub mock_search: bool,
    pub mock_images: bool,
}

/// External clients shared by every collaborator.
pub struct Services {
    pub llm: Arc<dyn LlmClient>,
    pub search: Arc<dyn SearchClient>,
    pub images: Arc<dyn ImageClient>,
    pub backends: Backends,
}

impl Services {
    /// Mock clients only; no network access.
    pub fn offline() -> Self {
        Self {
            llm: Arc::new(MockLlmClient::new()),
            search: Arc::new(MockSearchClient::new()),
            images: Arc::new(MockImageClient::new()),
            backends: Backends {
                mock_llm: true,
                mock_search: true,
                mock_images: true,
            },
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        if config.offline {
            info!("Offline mode, using mock services");
            return Ok(Self::offline());
        }

        let mut backends = Backends::default();

        let chat_config = ChatConfig {
            base_url: config.llm.base_url.clone(),
            model: config.llm.model.clone(),
            timeout: config.llm.timeout(),
        };
        let llm: Arc<dyn LlmClient> = match ChatCompletionsClient::from_env(&config.llm.api_key_env, chat_config) {
            Ok(client) => Arc::new(client),
            Err(LlmError::MissingApiKey { env_var }) => {
                warn!("{} not set, using mock LLM", env_var);
                backends.mock_llm = true;
                Arc::new(MockLlmClient::new())
            }
            Err(e) => return Err(e).context("Failed to create LLM client"),
        };

        let search: Arc<dyn SearchClient> = match TavilyClient::from_env(&config.search.api_key_env, config.search.timeout())
        {
            Ok(client) => Arc::new(FallbackSearch::new(client)),
            Err(SearchError::MissingApiKey { env_var }) => {
                warn!("{} not set, using mock search", env_var);
                backends.mock_search = true;
                Arc::new(MockSearchClient::new())
            }
            Err(e) => return Err(e).context("Failed to create search client"),
        };

        let fal_config = FalConfig {
            model: config.image.model.clone(),
            aspect_ratio: config.image.aspect_ratio.clone(),
            timeout: config.image.timeout(),
        };
        let images: Arc<dyn ImageClient> = Arc::new(
            FalClient::from_env(&config.image.api_key_env, fal_config)
                .context("Image generation needs an API key; set it or run with --offline")?,
        );

        Ok(Self {
            llm,
            search,
            images,
            backends,
        })
    }

    /// Assemble the control loop on top of these services.
    pub fn workflow(&self, config: &Config) -> Workflow {
        let llm = &config.llm;
        let temps = &llm.temperatures;

        let brief = BriefGenerator::new(self.llm.clone(), self.search.clone())
            .with_temperature(temps.brief)
            .with_max_tokens(llm.max_tokens)
            .with_max_results(config.search.max_results);
        let cv = CvGenerator::new(self.llm.clone(), self.search.clone())
            .with_temperature(temps.cv)
            .with_max_tokens(llm.max_tokens)
            .with_max_results(config.search.max_results);
        let reviewer = LlmReviewer::new(self.llm.clone())
            .with_temperature(temps.review)
            .with_max_tokens(llm.max_tokens);
        let refiner = LlmRefiner::new(self.llm.clone())
            .with_temperature(temps.refine)
            .with_max_tokens(llm.max_tokens);
        let illustrator = ImageIllustrator::new(self.images.clone()).with_aspect_ratio(config.image.aspect_ratio.clone());

        Workflow::new(
            Dispatcher::new(Arc::new(brief), Arc::new(cv)),
            Arc::new(reviewer),
            Arc::new(refiner),
            Arc::new(illustrator),
        )
    }
}
