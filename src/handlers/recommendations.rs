// /api/recommendations handlers

use chrono::Utc;
use serde_json::{json, Value};
use tracing::warn;
use warp::{Rejection, Reply};

use super::{from_body, is_blank, ok, text_field};
use crate::error::ApiError;
use crate::recommendations::{
    basic_crop_plan, farming_tips, CropAdviceRequest, TipsRequest, SEASONAL_CALENDAR,
};
use crate::state::SharedState;

pub async fn crop_advice(body: Value, state: SharedState) -> Result<impl Reply, Rejection> {
    if is_blank(&body) {
        return Err(ApiError::bad_request("Request data is required").into());
    }
    let request = CropAdviceRequest::from_json(&body)
        .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))?;

    let ai_plan = match &state.advisor {
        Some(advisor) => match advisor.crop_recommendations(&request.advice_input()).await {
            Ok(plan) => Some(plan),
            Err(e) => {
                warn!(error = %e, "AI crop advice failed, using basic rules");
                None
            }
        },
        None => None,
    };

    let mut reply = json!({
        "farmer_profile": &request.farmer,
        "season": &request.season,
        "location": &request.location,
        "generated_at": Utc::now().to_rfc3339(),
    });
    match ai_plan {
        Some(plan) => {
            reply["recommendations"] = plan;
            reply["ai_powered"] = json!(true);
        }
        None => {
            reply["recommendations"] = json!(basic_crop_plan(&request));
            reply["ai_powered"] = json!(false);
            reply["fallback_used"] = json!(true);
        }
    }
    ok(&reply)
}

pub async fn seasonal_calendar(body: Value) -> Result<impl Reply, Rejection> {
    let location = text_field(&body, "location").unwrap_or("India");
    ok(&json!({
        "seasonal_calendar": SEASONAL_CALENDAR,
        "location": location,
        "ai_enhanced": false,
        "generated_at": Utc::now().to_rfc3339(),
    }))
}

pub async fn personalized_tips(body: Value) -> Result<impl Reply, Rejection> {
    let request: TipsRequest = if body.is_null() {
        TipsRequest::default()
    } else {
        from_body(body)?
    };
    let tips = farming_tips(&request.experience_level);
    ok(&json!({
        "personalized_tips": tips,
        "farmer_profile": request,
        "ai_powered": false,
        "generated_at": Utc::now().to_rfc3339(),
    }))
}
