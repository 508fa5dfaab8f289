//! Mapping between abstraction types and OpenAI types

use crate::llm::core::{
    error::LlmError,
    types::{FinishReason, GenerateRequest, GenerateResponse, MessageRole, UsageMetadata},
};

use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

/// The system prompt becomes a leading `system` message
pub fn to_openai_request(model: &str, request: GenerateRequest) -> ChatCompletionRequest {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);
    if let Some(system) = request.system {
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: Some(system),
        });
    }
    messages.extend(request.messages.into_iter().map(|m| ChatMessage {
        role: match m.role {
            MessageRole::User => "user".to_string(),
            MessageRole::Assistant => "assistant".to_string(),
        },
        content: Some(m.text),
    }));

    ChatCompletionRequest {
        model: model.to_string(),
        messages,
        max_tokens: Some(request.config.max_tokens),
        temperature: request.config.temperature,
        top_p: request.config.top_p,
    }
}

pub fn from_openai_response(response: ChatCompletionResponse) -> Result<GenerateResponse, LlmError> {
    let usage = response
        .usage
        .map(|u| UsageMetadata::new(u.prompt_tokens, u.completion_tokens));

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::EmptyResponse("OpenAI returned no choices".to_string()))?;
    let finish_reason = choice.finish_reason.as_deref().map(FinishReason::from_provider);

    match choice.message.content {
        Some(text) if !text.trim().is_empty() => Ok(GenerateResponse {
            text,
            finish_reason,
            usage,
        }),
        _ => Err(LlmError::EmptyResponse(format!(
            "OpenAI finished with {:?}",
            finish_reason
        ))),
    }
}
