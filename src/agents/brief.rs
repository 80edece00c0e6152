//! AI industry hot-topic brief generator.
//!
//! Searches the last 24h of AI industry news, then asks the LLM to extract
//! tool names, uses and reception into a social-media-ready brief.

use std::sync::Arc;

use async_trait::async_trait;

use super::ask;
use super::traits::{CollaboratorError, Generator};
use crate::domain::TaskKind;
use crate::llm::LlmClient;
use crate::search::SearchClient;

const DEFAULT_SEARCH_QUERY: &str = "AI industry news latest 24 hours tools";

const SYSTEM_PROMPT: &str = "You are a professional AI industry analyst who turns search results into social media briefs.

Your task:
1. Extract the names of AI tools / products from the search results
2. Summarize what each tool does
3. Extract user reviews or industry reception
4. Produce a brief suitable for social media (concise, engaging, professional)

Output format:
## AI Hot-Topic Brief

### [Tool / product name 1]
- **Use**: [short description]
- **Highlight**: [key feature or advantage]
- **Reception**: [user feedback or industry opinion]

### [Tool / product name 2]
...

**Summary**: [one sentence on today's AI industry trend]";

/// Generator for `TaskKind::Brief`.
pub struct BriefGenerator {
    llm: Arc<dyn LlmClient>,
    search: Arc<dyn SearchClient>,
    temperature: f32,
    max_tokens: u32,
    max_results: usize,
}

impl BriefGenerator {
    pub fn new(llm: Arc<dyn LlmClient>, search: Arc<dyn SearchClient>) -> Self {
        Self {
            llm,
            search,
            temperature: 0.7,
            max_tokens: 2048,
            max_results: 5,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

/// Search query for a brief; an empty input falls back to general AI news.
pub fn search_query(input_query: &str) -> String {
    let input = input_query.trim();
    if input.is_empty() {
        DEFAULT_SEARCH_QUERY.to_string()
    } else {
        format!("AI industry {} latest 24 hours tools", input)
    }
}

fn user_prompt(search_results: &str) -> String {
    format!(
        "Write an AI industry hot-topic brief based on the following search results:\n\n\
         Search results:\n{}\n\n\
         Follow the output format strictly: extract tool names, uses and reception, and produce the brief.",
        search_results
    )
}

#[async_trait]
impl Generator for BriefGenerator {
    async fn generate(&self, _task_kind: TaskKind, input_query: &str) -> Result<String, CollaboratorError> {
        let query = search_query(input_query);
        log::debug!("Brief search query: {}", query);

        let results = self.search.search(&query, self.max_results).await?;
        ask(
            self.llm.as_ref(),
            SYSTEM_PROMPT,
            user_prompt(&results),
            self.temperature,
            self.max_tokens,
        )
        .await
    }

    fn name(&self) -> &str {
        "brief"
    }
}
