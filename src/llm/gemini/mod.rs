//! Gemini provider
//!
//! Talks to Gemini either through the public API-key endpoint or through
//! Vertex AI, implementing the LlmProvider trait.

pub mod client;
pub mod mapper;
pub mod types;

pub use client::{GeminiAuth, GeminiClient};
