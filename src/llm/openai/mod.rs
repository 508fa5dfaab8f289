//! OpenAI chat completions provider

pub mod client;
pub mod mapper;
pub mod types;

pub use client::OpenAiClient;
