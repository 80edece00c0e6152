//! LLM Client Layer
//!
//! This module provides:
//! - LlmClient trait for API abstraction
//! - ChatCompletionsClient for OpenAI-compatible endpoints (DeepSeek by default)
//! - MockLlmClient for offline runs and tests

pub mod chat;
pub mod client;
pub mod mock;

pub use chat::{ChatCompletionsClient, ChatConfig};
pub use client::{CompletionRequest, CompletionResponse, LlmClient, LlmError, Message, Role, TokenUsage};
pub use mock::MockLlmClient;
