// /api/price handlers

use chrono::Local;
use serde::Deserialize;
use serde_json::{json, Value};
use warp::{Rejection, Reply};

use super::{ok, text_field};
use crate::error::ApiError;
use crate::price::{self, PriceError};

const DEFAULT_DAYS: i64 = 30;

impl From<PriceError> for ApiError {
    fn from(err: PriceError) -> Self {
        match err {
            PriceError::CropNotFound => ApiError::not_found(err.to_string()),
            PriceError::InvalidDays => ApiError::bad_request(err.to_string()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LocationQuery {
    pub state: Option<String>,
    pub market: Option<String>,
}

pub async fn predict(body: Value) -> Result<impl Reply, Rejection> {
    let crop = text_field(&body, "crop").ok_or_else(|| ApiError::bad_request("Crop name is required"))?;
    let days = match body.get("days") {
        None | Some(Value::Null) => DEFAULT_DAYS,
        Some(value) => value.as_i64().ok_or(PriceError::InvalidDays).map_err(ApiError::from)?,
    };
    let state = text_field(&body, "state");
    let market = text_field(&body, "market");

    let prediction = price::predict(crop, days, state, market, Local::now().date_naive())
        .map_err(ApiError::from)?;
    ok(&prediction)
}

pub async fn market_prices(query: LocationQuery) -> Result<impl Reply, Rejection> {
    let prices = price::market_prices(
        query.state.as_deref(),
        query.market.as_deref(),
        Local::now().date_naive(),
    );
    ok(&prices)
}

pub async fn states() -> Result<impl Reply, Rejection> {
    ok(&json!({ "states": price::states() }))
}

pub async fn markets(state: String) -> Result<impl Reply, Rejection> {
    let markets = price::markets_for(&state)
        .ok_or_else(|| ApiError::not_found(format!("State \"{}\" not found", state)))?;
    ok(&json!({ "state": state, "markets": markets }))
}

pub async fn crops() -> Result<impl Reply, Rejection> {
    ok(&json!({ "crops": price::crop_names() }))
}

pub async fn compare(body: Value) -> Result<impl Reply, Rejection> {
    let crops: Vec<String> = body
        .get("crops")
        .and_then(Value::as_array)
        .filter(|crops| !crops.is_empty())
        .ok_or_else(|| ApiError::bad_request("Crops list is required"))?
        .iter()
        .filter_map(|c| c.as_str().map(str::to_string))
        .collect();

    let comparison = price::compare(&crops, Local::now().date_naive());
    ok(&json!({ "comparison": comparison }))
}
