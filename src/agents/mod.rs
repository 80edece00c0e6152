//! Collaborators: the content generators, the reviewer, the refiner and the
//! illustrator, plus the traits the control loop sees them through.

pub mod brief;
pub mod cv;
pub mod illustrator;
pub mod refiner;
pub mod reviewer;
pub mod traits;

pub use brief::BriefGenerator;
pub use cv::CvGenerator;
pub use illustrator::ImageIllustrator;
pub use refiner::LlmRefiner;
pub use reviewer::LlmReviewer;
pub use traits::{CollaboratorError, Generator, Illustrator, Refiner, Reviewer};

use crate::llm::{CompletionRequest, LlmClient};

/// One single-turn LLM call; a blank answer is an error.
async fn ask(
    llm: &dyn LlmClient,
    system_prompt: impl Into<String>,
    user_prompt: String,
    temperature: f32,
    max_tokens: u32,
) -> Result<String, CollaboratorError> {
    let request = CompletionRequest::single(system_prompt, user_prompt, temperature, max_tokens);
    let response = llm.complete(request).await?;

    if response.content.trim().is_empty() {
        return Err(CollaboratorError::EmptyResponse(format!(
            "{} returned no text",
            llm.model()
        )));
    }

    Ok(response.content)
}
