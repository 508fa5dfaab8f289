//! Provider trait for LLM implementations

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use super::{
    error::LlmError,
    types::{GenerateRequest, GenerateResponse},
};
use crate::config::{AiProviderKind, AiSettings};
use crate::llm::gemini::{GeminiAuth, GeminiClient};
use crate::llm::openai::OpenAiClient;

/// Main interface that all LLM provider implementations must satisfy
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a request and wait for the complete answer
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError>;

    /// Short identifier used in response metadata (`AI_<name>`)
    fn name(&self) -> &'static str;
}

/// Create the configured LLM provider
///
/// Returns `Ok(None)` when AI is disabled or the selected provider has no
/// credentials; the callers then fall back to rule-based answers.
///
/// # Errors
///
/// Returns an error if a configured provider cannot be initialised, e.g. when
/// Application Default Credentials are requested but cannot be discovered.
pub async fn create_provider(
    settings: &AiSettings,
) -> Result<Option<Arc<dyn LlmProvider>>, LlmError> {
    match settings.provider {
        AiProviderKind::Disabled => Ok(None),
        AiProviderKind::Gemini => {
            let auth = if let Some(project_id) = &settings.gcp_project_id {
                GeminiAuth::vertex(project_id.clone(), settings.gcp_location.clone()).await?
            } else if let Some(key) = &settings.gemini_api_key {
                GeminiAuth::ApiKey(key.clone())
            } else {
                info!("Gemini selected but neither GEMINI_API_KEY nor GCP_PROJECT_ID is set");
                return Ok(None);
            };
            let client = GeminiClient::new(auth, settings.gemini_model.clone())?;
            Ok(Some(Arc::new(client)))
        }
        AiProviderKind::OpenAi => match &settings.openai_api_key {
            Some(key) => {
                let client = OpenAiClient::new(key.clone(), settings.openai_model.clone())?;
                Ok(Some(Arc::new(client)))
            }
            None => {
                info!("OpenAI selected but OPENAI_API_KEY is not set");
                Ok(None)
            }
        },
    }
}
