//! Computer vision project / trend analyst.
//!
//! Searches a specific CV project or trend and asks the LLM for a strictly
//! source-grounded analysis of its tech stack and deployment scenarios.

use std::sync::Arc;

use async_trait::async_trait;

use super::ask;
use super::traits::{CollaboratorError, Generator};
use crate::domain::TaskKind;
use crate::llm::LlmClient;
use crate::search::SearchClient;

const SYSTEM_PROMPT: &str = "You are a rigorous computer vision expert who extracts technical information from search results and analyses it.

Principles:
1. **No fabrication**: everything must come from the search results; add nothing they do not contain
2. **Precise extraction**: the tech stack must be accurate, including model names, engines and frameworks
3. **Fact based**: deployment scenarios must be based on real cases in the search results

Your task:
1. Extract the tech stack (models, engines, frameworks)
2. Analyse the deployment scenarios
3. Summarize technical characteristics and innovations

Output format:
## CV Project / Trend Analysis

### Tech stack
- **Models**: [...]
- **Engines**: [...]
- **Frameworks**: [...]
- **Other tools**: [...]

### Deployment scenarios
[...]

### Technical characteristics
[...]

**Sources**: based on search results only";

/// Generator for `TaskKind::Cv`.
pub struct CvGenerator {
    llm: Arc<dyn LlmClient>,
    search: Arc<dyn SearchClient>,
    temperature: f32,
    max_tokens: u32,
    max_results: usize,
}

impl CvGenerator {
    pub fn new(llm: Arc<dyn LlmClient>, search: Arc<dyn SearchClient>) -> Self {
        Self {
            llm,
            search,
            temperature: 0.5,
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

pub fn search_query(input_query: &str) -> String {
    format!("computer vision {} project technology stack", input_query.trim())
}

fn user_prompt(input_query: &str, search_results: &str) -> String {
    format!(
        "Analyse the CV project / trend '{}' based on the following search results:\n\n\
         Search results:\n{}\n\n\
         Important: follow the no-fabrication principle. If the search results do not cover \
         something, say \"not found in search results\".",
        input_query, search_results
    )
}

#[async_trait]
impl Generator for CvGenerator {
    async fn generate(&self, _task_kind: TaskKind, input_query: &str) -> Result<String, CollaboratorError> {
        let input = input_query.trim();
        if input.is_empty() {
            return Err(CollaboratorError::InvalidInput(
                "cv tasks need a project or trend keyword".to_string(),
            ));
        }

        let query = search_query(input);
        log::debug!("CV search query: {}", query);

        let results = self.search.search(&query, self.max_results).await?;
        ask(
            self.llm.as_ref(),
            SYSTEM_PROMPT,
            user_prompt(input, &results),
            self.temperature,
            self.max_tokens,
        )
        .await
    }

    fn name(&self) -> &str {
        "cv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlmClient;
    use crate::search::MockSearchClient;

    #[test]
    fn test_search_query() {
        assert_eq!(search_query(" SAM 2 "), "computer vision SAM 2 project technology stack");
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected_without_calls() {
        let llm = Arc::new(MockLlmClient::new());
        let generator = CvGenerator::new(llm.clone(), Arc::new(MockSearchClient::new()));

        let err = generator.generate(TaskKind::Cv, "  ").await.unwrap_err();
        assert!(matches!(err, CollaboratorError::InvalidInput(_)));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_prompt() {
        let llm = Arc::new(MockLlmClient::new());
        let generator = CvGenerator::new(llm.clone(), Arc::new(MockSearchClient::new()));

        let content = generator.generate(TaskKind::Cv, "yolov8").await.unwrap();
        assert!(content.contains("Tech stack"));

        let requests = llm.requests();
        assert!((requests[0].temperature - 0.5).abs() < f32::EPSILON);
        let user = requests[0].user_text().unwrap();
        assert!(user.contains("'yolov8'"));
        assert!(user.contains("computer vision yolov8 project technology stack"));
    }
}
