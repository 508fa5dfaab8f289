//! OpenAI client implementation

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::llm::core::{
    error::{check_response, LlmError},
    provider::LlmProvider,
    types::{GenerateRequest, GenerateResponse},
};

use super::mapper::{from_openai_response, to_openai_request};
use super::types::ChatCompletionResponse;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Client for OpenAI chat completion models
pub struct OpenAiClient {
    http_client: Client,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: String, model: String) -> Result<Self, LlmError> {
        let http_client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(5))
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| LlmError::HttpError {
                status: 0,
                body: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let body = to_openai_request(&self.model, request);
        debug!(model = %self.model, "Sending OpenAI chat completion request");

        let response = self
            .http_client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let response = check_response(response).await?;
        let parsed: ChatCompletionResponse = response.json().await?;
        from_openai_response(parsed)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
