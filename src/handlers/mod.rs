//! Request handlers, one module per route group

pub mod chatbot;
pub mod disease;
pub mod health;
pub mod price;
pub mod profile;
pub mod recommendations;
pub mod schemes;
pub mod stories;

use bytes::Bytes;
use serde::Serialize;
use serde_json::{Map, Value};
use warp::http::StatusCode;
use warp::{Filter, Rejection};

use crate::error::ApiError;

/// Largest JSON body accepted
pub const JSON_BODY_LIMIT: u64 = 1024 * 1024;

/// Serialize `body` and mark it successful.
///
/// Objects get `"success": true` merged in; anything else is wrapped as
/// `{"success": true, "data": ...}`.
pub fn success<T: Serialize>(body: &T) -> Result<Value, ApiError> {
    let value = serde_json::to_value(body).map_err(|e| ApiError::Internal(e.to_string()))?;
    let mut object = match value {
        Value::Object(object) => object,
        other => {
            let mut object = Map::new();
            object.insert("data".to_string(), other);
            object
        }
    };
    object.insert("success".to_string(), Value::Bool(true));
    Ok(Value::Object(object))
}

pub fn ok<T: Serialize>(body: &T) -> Result<warp::reply::WithStatus<warp::reply::Json>, Rejection> {
    with_status(body, StatusCode::OK)
}

pub fn created<T: Serialize>(
    body: &T,
) -> Result<warp::reply::WithStatus<warp::reply::Json>, Rejection> {
    with_status(body, StatusCode::CREATED)
}

fn with_status<T: Serialize>(
    body: &T,
    status: StatusCode,
) -> Result<warp::reply::WithStatus<warp::reply::Json>, Rejection> {
    let value = success(body)?;
    Ok(warp::reply::with_status(warp::reply::json(&value), status))
}

/// A JSON body that may be absent: an empty body reads as `null`.
///
/// Requests without a `content-length` header (no body, or chunked) are
/// read as-is and checked against the limit after buffering.
pub fn json_body() -> impl Filter<Extract = (Value,), Error = Rejection> + Clone {
    warp::header::optional::<u64>("content-length")
        .and_then(|length: Option<u64>| async move {
            match length {
                Some(length) if length > JSON_BODY_LIMIT => {
                    Err(Rejection::from(ApiError::PayloadTooLarge))
                }
                _ => Ok(()),
            }
        })
        .untuple_one()
        .and(warp::body::bytes())
        .and_then(|bytes: Bytes| async move {
            if bytes.len() as u64 > JSON_BODY_LIMIT {
                return Err(Rejection::from(ApiError::PayloadTooLarge));
            }
            parse_json_body(&bytes).map_err(Rejection::from)
        })
}

pub fn parse_json_body(bytes: &[u8]) -> Result<Value, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes).map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {}", e)))
}

/// A percent-decoded path segment such as `Tamil%20Nadu`
pub fn decoded_param() -> impl Filter<Extract = (String,), Error = Rejection> + Clone {
    warp::path::param::<String>().and_then(|raw: String| async move {
        urlencoding::decode(&raw)
            .map(|s| s.into_owned())
            .map_err(|_| Rejection::from(ApiError::bad_request("Invalid path segment")))
    })
}

/// `null`, `{}` and `[]` count as no data
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// A non-empty string field of a JSON object
pub fn text_field<'a>(body: &'a Value, name: &str) -> Option<&'a str> {
    body.get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Deserialize a typed body, reporting failures as 400
pub fn from_body<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_merges_flag() {
        let value = success(&json!({"count": 2})).unwrap();
        assert_eq!(value, json!({"count": 2, "success": true}));

        let value = success(&vec![1, 2]).unwrap();
        assert_eq!(value, json!({"data": [1, 2], "success": true}));
    }

    #[test]
    fn test_parse_json_body() {
        assert_eq!(parse_json_body(b"").unwrap(), Value::Null);
        assert_eq!(parse_json_body(b"  \n").unwrap(), Value::Null);
        assert_eq!(parse_json_body(b"{\"a\":1}").unwrap(), json!({"a": 1}));
        assert!(matches!(
            parse_json_body(b"{oops"),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(&Value::Null));
        assert!(is_blank(&json!({})));
        assert!(!is_blank(&json!({"has_land": false})));
    }

    #[test]
    fn test_text_field() {
        let body = json!({"message": "  ", "crop": "tomatoes", "days": 3});
        assert_eq!(text_field(&body, "message"), None);
        assert_eq!(text_field(&body, "crop"), Some("tomatoes"));
        assert_eq!(text_field(&body, "days"), None);
    }
}
