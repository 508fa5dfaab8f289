//! Gemini client implementation

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::llm::auth::AuthenticationManager;
use crate::llm::core::{
    error::{check_response, LlmError},
    provider::LlmProvider,
    types::{GenerateRequest, GenerateResponse},
};

use super::mapper::{from_gemini_response, to_gemini_request};
use super::types::GenerateContentResponse;

const GENERATIVE_LANGUAGE_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// How requests to Gemini are authorised
pub enum GeminiAuth {
    /// Google AI Studio API key, sent as `x-goog-api-key`
    ApiKey(String),
    /// Vertex AI with Application Default Credentials
    Vertex {
        project_id: String,
        location: String,
        auth_manager: AuthenticationManager,
    },
}

impl GeminiAuth {
    /// Discover ADC and target Vertex AI in `project_id` / `location`
    pub async fn vertex(project_id: String, location: String) -> Result<Self, LlmError> {
        let auth_manager = AuthenticationManager::new().await?;
        Ok(GeminiAuth::Vertex {
            project_id,
            location,
            auth_manager,
        })
    }
}

/// Client for Gemini models
pub struct GeminiClient {
    http_client: Client,
    auth: GeminiAuth,
    /// Model id, e.g. "gemini-2.5-flash"
    model: String,
}

impl GeminiClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(auth: GeminiAuth, model: String) -> Result<Self, LlmError> {
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
            auth,
            model,
        })
    }

    fn build_endpoint_url(&self) -> String {
        match &self.auth {
            GeminiAuth::ApiKey(_) => api_key_endpoint(&self.model),
            GeminiAuth::Vertex {
                project_id,
                location,
                ..
            } => vertex_endpoint(project_id, location, &self.model),
        }
    }
}

fn api_key_endpoint(model: &str) -> String {
    format!("{}/models/{}:generateContent", GENERATIVE_LANGUAGE_BASE, model)
}

fn vertex_endpoint(project_id: &str, location: &str, model: &str) -> String {
    format!(
        "https://{}-aiplatform.googleapis.com/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
        location, project_id, location, model
    )
}

#[async_trait]
impl LlmProvider for GeminiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let body = to_gemini_request(request);
        let url = self.build_endpoint_url();
        debug!(model = %self.model, "Sending Gemini generateContent request");

        let builder = self.http_client.post(&url).json(&body);
        let builder = match &self.auth {
            GeminiAuth::ApiKey(key) => builder.header("x-goog-api-key", key),
            GeminiAuth::Vertex { auth_manager, .. } => {
                let token = auth_manager.get_token().await?;
                builder.bearer_auth(token)
            }
        };

        let response = check_response(builder.send().await?).await?;
        let parsed: GenerateContentResponse = response.json().await?;
        from_gemini_response(parsed)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_endpoint_format() {
        let url = api_key_endpoint("gemini-2.5-flash");
        assert_eq!(
            url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_vertex_endpoint_format() {
        let url = vertex_endpoint("my-project", "us-central1", "gemini-2.5-flash");
        assert!(url.starts_with("https://us-central1-aiplatform.googleapis.com/v1/"));
        assert!(url.contains("projects/my-project/locations/us-central1"));
        assert!(url.ends_with("models/gemini-2.5-flash:generateContent"));
    }

    #[test]
    fn test_client_uses_api_key_endpoint() {
        let client = GeminiClient::new(
            GeminiAuth::ApiKey("k".to_string()),
            "gemini-2.5-pro".to_string(),
        )
        .unwrap();
        assert!(client.build_endpoint_url().contains("gemini-2.5-pro:generateContent"));
        assert_eq!(client.name(), "gemini");
    }
}
