//! Error types for the LLM layer

use reqwest::header::RETRY_AFTER;
use reqwest::{Response, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when using LLM providers
#[derive(Debug, Error)]
pub enum LlmError {
    /// Missing or rejected credentials
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// HTTP request failures
    #[error("HTTP error (status {status}): {body}")]
    HttpError { status: u16, body: String },

    /// JSON encoding/decoding issues
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded (retry after {retry_after:?})")]
    RateLimitExceeded { retry_after: Option<Duration> },

    /// The provider answered but produced no usable text
    #[error("Empty response: {0}")]
    EmptyResponse(String),

    /// Provider-specific errors
    #[error("Provider error ({code}): {message}")]
    ProviderError { code: String, message: String },
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return LlmError::SerializationError(err.to_string());
        }
        LlmError::HttpError {
            status: err.status().map(|s| s.as_u16()).unwrap_or(0),
            body: err.to_string(),
        }
    }
}

/// Pass successful responses through and turn everything else into an `LlmError`.
pub(crate) async fn check_response(response: Response) -> Result<Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_retry_after);
    let body = response.text().await.unwrap_or_default();

    Err(error_for_status(status, retry_after, body))
}

fn error_for_status(status: StatusCode, retry_after: Option<Duration>, body: String) -> LlmError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded { retry_after },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::AuthenticationError(body),
        StatusCode::BAD_REQUEST => LlmError::InvalidRequest(body),
        _ => LlmError::HttpError {
            status: status.as_u16(),
            body,
        },
    }
}

fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let err = LlmError::HttpError {
            status: 502,
            body: "Bad gateway".to_string(),
        };
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("Bad gateway"));
    }

    #[test]
    fn test_rate_limit_mapping_keeps_retry_after() {
        let err = error_for_status(
            StatusCode::TOO_MANY_REQUESTS,
            parse_retry_after("30"),
            String::new(),
        );
        match err {
            LlmError::RateLimitExceeded { retry_after } => {
                assert_eq!(retry_after, Some(Duration::from_secs(30)));
            }
            other => panic!("Expected rate limit error, got {:?}", other),
        }
    }

    #[test]
    fn test_auth_statuses_map_to_authentication_error() {
        let err = error_for_status(StatusCode::UNAUTHORIZED, None, "bad key".to_string());
        assert!(matches!(err, LlmError::AuthenticationError(ref b) if b == "bad key"));

        let err = error_for_status(StatusCode::FORBIDDEN, None, String::new());
        assert!(matches!(err, LlmError::AuthenticationError(_)));
    }

    #[test]
    fn test_other_statuses_map_to_http_error() {
        let err = error_for_status(StatusCode::INTERNAL_SERVER_ERROR, None, "boom".to_string());
        assert!(matches!(err, LlmError::HttpError { status: 500, .. }));
    }

    #[test]
    fn test_retry_after_ignores_http_dates() {
        assert_eq!(parse_retry_after(" 12 "), Some(Duration::from_secs(12)));
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
    }

    #[test]
    fn test_from_serde_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let llm_err: LlmError = json_err.into();
        assert!(matches!(llm_err, LlmError::SerializationError(_)));
    }
}
