//! Offline LLM client.
//!
//! Used when no API key is configured and by tests. In canned mode the reply
//! is picked from the user message: brief prompts get a sample brief,
//! computer-vision prompts get a sample analysis, anything else gets a generic
//! echo. In scripted mode replies are returned in order.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::client::{CompletionRequest, CompletionResponse, LlmClient, LlmError, TokenUsage};

const MOCK_MODEL: &str = "mock-model";

const MOCK_NOTICE: &str = "*Note: this is mock data; set DEEPSEEK_API_KEY for real results.*";

const MOCK_BRIEF: &str = "## AI Hot-Topic Brief

### ChatGPT-4
- **Use**: multimodal AI assistant
- **Highlight**: text, image and code generation
- **Reception**: positive user feedback, broad industry adoption

### Claude 3
- **Use**: enterprise AI assistant
- **Highlight**: strong safety posture, suited to enterprise workloads
- **Reception**: stands out on privacy protection

**Summary**: AI tooling is moving toward multimodal and enterprise use.";

const MOCK_CV: &str = "## CV Project / Trend Analysis

### Tech stack
- **Models**: YOLOv8, ResNet-50
- **Engines**: TensorRT, ONNX Runtime
- **Frameworks**: PyTorch, TensorFlow
- **Other tools**: OpenCV, CUDA

### Deployment scenarios
- Object detection for autonomous driving
- Defect detection in industrial inspection
- Medical image analysis

### Technical characteristics
- Real-time inference
- Edge deployment support
- Mature model compression

**Sources**: based on search results only.";

enum Mode {
    Canned,
    Scripted(Mutex<VecDeque<String>>),
}

/// Mock LLM client.
pub struct MockLlmClient {
    mode: Mode,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlmClient {
    /// Keyword-driven canned replies.
    pub fn new() -> Self {
        Self {
            mode: Mode::Canned,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Replies returned in order; exhausting them is an `InvalidResponse` error.
    pub fn scripted<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: Mode::Scripted(Mutex::new(replies.into_iter().map(Into::into).collect())),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    fn next_reply(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        match &self.mode {
            Mode::Canned => Ok(canned_reply(request.user_text().unwrap_or_default())),
            Mode::Scripted(replies) => replies
                .lock()
                .map_err(|_| LlmError::InvalidResponse("mock reply queue poisoned".to_string()))?
                .pop_front()
                .ok_or_else(|| LlmError::InvalidResponse("mock replies exhausted".to_string())),
        }
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

fn canned_reply(user: &str) -> String {
    let lower = user.to_lowercase();
    if lower.contains("brief") {
        format!("{}\n\n{}", MOCK_BRIEF, MOCK_NOTICE)
    } else if lower.contains("computer vision") || user.contains("CV") {
        format!("{}\n\n{}", MOCK_CV, MOCK_NOTICE)
    } else {
        let summary: String = user.chars().take(100).collect();
        format!("This is a mock LLM response.\n\nInput summary: {}...\n\n{}", summary, MOCK_NOTICE)
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let content = self.next_reply(&request)?;
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        Ok(CompletionResponse {
            content,
            model: MOCK_MODEL.to_string(),
            usage: TokenUsage::default(),
        })
    }

    fn model(&self) -> &str {
        MOCK_MODEL
    }
}
