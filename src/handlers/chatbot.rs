// /api/chatbot handlers

use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::warn;
use warp::{Rejection, Reply};

use super::{ok, text_field};
use crate::chatbot::{respond, FarmerContext, LANGUAGES, TOPICS};
use crate::db::types::User;
use crate::error::ApiError;
use crate::state::SharedState;

const HISTORY_PAGE: i64 = 50;

/// `user_id` from the body (string or number), else the caller, else "anonymous"
fn conversation_key(body: &Value, caller: Option<&User>) -> String {
    match body.get("user_id") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => caller
            .map(|u| u.id.to_string())
            .unwrap_or_else(|| "anonymous".to_string()),
    }
}

fn farmer_context(body: &Value) -> FarmerContext {
    let field = |name: &str| text_field(body, name).map(str::to_string);
    FarmerContext {
        location: field("location"),
        farm_size: body
            .get("farm_size")
            .and_then(|v| match v {
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .or_else(|| field("farm_size")),
        crops: field("crops"),
        experience: field("experience"),
    }
}

pub async fn chat(
    body: Value,
    caller: Option<User>,
    state: SharedState,
) -> Result<impl Reply, Rejection> {
    let message = text_field(&body, "message").ok_or_else(|| ApiError::bad_request("Message is required"))?;
    let language = text_field(&body, "language").unwrap_or("en");

    let mut reply = Map::new();
    reply.insert("message".to_string(), json!(message));
    reply.insert("language".to_string(), json!(language));

    let ai_answer = match &state.chatbot {
        Some(bot) => {
            let key = conversation_key(&body, caller.as_ref());
            match bot.reply(&key, message, language, &farmer_context(&body)).await {
                Ok(answer) => Some(answer),
                Err(e) => {
                    warn!(error = %e, provider = bot.provider_name(), "AI chatbot failed, using knowledge base");
                    None
                }
            }
        }
        None => None,
    };

    let (response, generated_at) = match ai_answer {
        Some(answer) => {
            reply.insert("language".to_string(), json!(answer.language));
            reply.insert("ai_powered".to_string(), json!(true));
            reply.insert("conversation_turn".to_string(), json!(answer.conversation_turn));
            reply.insert("context_used".to_string(), json!(answer.context_used));
            (answer.response, answer.generated_at)
        }
        None => {
            reply.insert("ai_powered".to_string(), json!(false));
            reply.insert("fallback_used".to_string(), json!(true));
            (respond(message, language).to_string(), Utc::now())
        }
    };

    if let Some(user) = &caller {
        if let Err(e) = state.db.log_chat(user.id, message, &response, language).await {
            warn!(error = %e, user_id = user.id, "Could not store chat history");
        }
    }

    reply.insert("response".to_string(), json!(response));
    reply.insert("timestamp".to_string(), json!(generated_at.to_rfc3339()));
    ok(&Value::Object(reply))
}

pub async fn topics() -> Result<impl Reply, Rejection> {
    let keys: Vec<&str> = TOPICS.iter().map(|t| t.key).collect();
    let details: Map<String, Value> = TOPICS
        .iter()
        .map(|t| (t.key.to_string(), json!(t.description)))
        .collect();
    ok(&json!({ "topics": { "en": keys, "topics_details": details } }))
}

pub async fn languages() -> Result<impl Reply, Rejection> {
    ok(&json!({ "languages": LANGUAGES }))
}

pub async fn history(user: User, state: SharedState) -> Result<impl Reply, Rejection> {
    let records = state
        .db
        .chat_history_for(user.id, HISTORY_PAGE)
        .await
        .map_err(ApiError::from)?;
    ok(&json!({ "count": records.len(), "history": records }))
}
