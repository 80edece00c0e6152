//! Quillr - social media content with an automated editor in the loop
//!
//! A run routes a task kind to its generator, then lets an LLM reviewer and
//! refiner iterate on the draft (at most twice) before the finished content
//! is illustrated.

pub mod agents;
pub mod config;
pub mod domain;
pub mod error;
pub mod image;
pub mod llm;
pub mod search;
pub mod services;
pub mod workflow;

pub use error::{Result, RunError, WorkflowError};
pub use workflow::Workflow;
