//! LLM Abstraction Layer
//!
//! A single `LlmProvider` interface over Google Gemini (API key or Vertex AI)
//! and OpenAI chat completions. Used by the chatbot and recommendation
//! services; every caller has a rule-based fallback when no provider is set.

pub mod auth;
pub mod core;
pub mod gemini;
pub mod openai;

// Re-export commonly used types
pub use core::{
    config::GenerationConfig,
    error::LlmError,
    provider::{create_provider, LlmProvider},
    types::{FinishReason, GenerateRequest, GenerateResponse, Message, MessageRole, UsageMetadata},
};
