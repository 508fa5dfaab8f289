//! Mapping between abstraction types and Gemini types

use crate::llm::core::{
    config::GenerationConfig,
    error::LlmError,
    types::{FinishReason, GenerateRequest, GenerateResponse, Message, MessageRole, UsageMetadata},
};

use super::types::{
    Content, GeminiGenerationConfig, GenerateContentRequest, GenerateContentResponse, Part,
    SystemInstruction,
};

/// Convert our abstraction request to Gemini's request format
pub fn to_gemini_request(request: GenerateRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: request.messages.into_iter().map(to_gemini_content).collect(),
        system_instruction: request.system.map(|text| SystemInstruction {
            parts: vec![Part { text }],
        }),
        generation_config: Some(to_gemini_generation_config(request.config)),
    }
}

fn to_gemini_content(message: Message) -> Content {
    let role = match message.role {
        MessageRole::User => "user",
        MessageRole::Assistant => "model",
    };
    Content {
        role: role.to_string(),
        parts: vec![Part { text: message.text }],
    }
}

fn to_gemini_generation_config(config: GenerationConfig) -> GeminiGenerationConfig {
    GeminiGenerationConfig {
        max_output_tokens: Some(config.max_tokens),
        temperature: config.temperature,
        top_p: config.top_p,
    }
}

/// Convert the first candidate into a complete response
///
/// # Errors
///
/// `ProviderError` when the prompt was blocked, `EmptyResponse` when the
/// model returned no text.
pub fn from_gemini_response(response: GenerateContentResponse) -> Result<GenerateResponse, LlmError> {
    let usage = response.usage_metadata.map(|u| UsageMetadata {
        input_tokens: u.prompt_token_count,
        output_tokens: u.candidates_token_count,
        total_tokens: u.total_token_count,
    });

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates".to_string());
        return Err(LlmError::ProviderError {
            code: "blocked".to_string(),
            message: reason,
        });
    };

    let text: String = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .map(|p| p.text)
        .collect::<Vec<_>>()
        .join("");
    let finish_reason = candidate
        .finish_reason
        .as_deref()
        .map(FinishReason::from_provider);

    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse(format!(
            "Gemini finished with {:?}",
            finish_reason
        )));
    }

    Ok(GenerateResponse {
        text,
        finish_reason,
        usage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::gemini::types::{Candidate, PromptFeedback};

    #[test]
    fn test_request_maps_roles_and_system() {
        let request = GenerateRequest {
            messages: vec![Message::user("Hi"), Message::assistant("Hello farmer")],
            config: GenerationConfig::new(300).with_temperature(0.4),
            system: Some("You are AgriBot".to_string()),
        };
        let gemini = to_gemini_request(request);

        assert_eq!(gemini.contents.len(), 2);
        assert_eq!(gemini.contents[0].role, "user");
        assert_eq!(gemini.contents[1].role, "model");
        assert_eq!(
            gemini.system_instruction.unwrap().parts[0].text,
            "You are AgriBot"
        );
        let config = gemini.generation_config.unwrap();
        assert_eq!(config.max_output_tokens, Some(300));
        assert_eq!(config.temperature, Some(0.4));
    }

    #[test]
    fn test_response_joins_parts() {
        let response = GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: "model".to_string(),
                    parts: vec![
                        Part { text: "Water early, ".to_string() },
                        Part { text: "mulch well.".to_string() },
                    ],
                }),
                finish_reason: Some("STOP".to_string()),
            }],
            prompt_feedback: None,
            usage_metadata: None,
        };
        let mapped = from_gemini_response(response).unwrap();
        assert_eq!(mapped.text, "Water early, mulch well.");
        assert_eq!(mapped.finish_reason, Some(FinishReason::Stop));
    }

    #[test]
    fn test_blocked_prompt_is_provider_error() {
        let response = GenerateContentResponse {
            candidates: vec![],
            prompt_feedback: Some(PromptFeedback {
                block_reason: Some("SAFETY".to_string()),
            }),
            usage_metadata: None,
        };
        match from_gemini_response(response) {
            Err(LlmError::ProviderError { message, .. }) => assert_eq!(message, "SAFETY"),
            other => panic!("Expected provider error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_text_is_error() {
        let response = GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: "model".to_string(),
                    parts: vec![],
                }),
                finish_reason: Some("MAX_TOKENS".to_string()),
            }],
            prompt_feedback: None,
            usage_metadata: None,
        };
        assert!(matches!(
            from_gemini_response(response),
            Err(LlmError::EmptyResponse(_))
        ));
    }

    #[test]
    fn test_missing_content_is_empty_response() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        match from_gemini_response(response) {
            Err(LlmError::EmptyResponse(detail)) => assert!(detail.contains("Safety")),
            other => panic!("Expected empty response, got {:?}", other),
        }
    }
}
