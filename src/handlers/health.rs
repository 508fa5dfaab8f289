// GET /api/health

use serde_json::json;
use warp::{Rejection, Reply};

use super::ok;
use crate::state::SharedState;

pub const FEATURES: &[&str] = &[
    "price_prediction",
    "state_market_selection",
    "chatbot",
    "disease_detection",
    "government_schemes",
    "farm_stories",
    "user_profiles",
    "crop_recommendations",
];

pub async fn health(state: SharedState) -> Result<impl Reply, Rejection> {
    ok(&json!({
        "status": "healthy",
        "message": "AgroMitra API is running",
        "features": FEATURES,
        "disease_model_loaded": state.classifier.is_some(),
        "ai_available": state.ai_available(),
        "ai_provider": state.chatbot.as_ref().map(|bot| bot.provider_name()),
    }))
}
