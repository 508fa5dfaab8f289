// /api/schemes handlers

use serde::Deserialize;
use serde_json::{json, Value};
use warp::{Rejection, Reply};

use super::{from_body, is_blank, ok};
use crate::error::ApiError;
use crate::schemes::{self, FarmerSituation};

#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn all(query: CategoryQuery) -> Result<impl Reply, Rejection> {
    let found = schemes::by_category(query.category.as_deref());
    ok(&json!({ "count": found.len(), "schemes": found }))
}

pub async fn scheme(id: u32) -> Result<impl Reply, Rejection> {
    let scheme = schemes::find(id).ok_or_else(|| ApiError::not_found("Scheme not found"))?;
    ok(&json!({ "scheme": scheme }))
}

pub async fn categories() -> Result<impl Reply, Rejection> {
    ok(&json!({ "categories": schemes::categories() }))
}

pub async fn check_eligibility(body: Value) -> Result<impl Reply, Rejection> {
    if is_blank(&body) {
        return Err(ApiError::bad_request("No data provided").into());
    }
    let farmer: FarmerSituation = from_body(body)?;
    let eligible = schemes::check_eligibility(&farmer);
    ok(&json!({
        "eligible_schemes_count": eligible.len(),
        "eligible_schemes": eligible,
    }))
}

pub async fn search(query: SearchQuery) -> Result<impl Reply, Rejection> {
    let q = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::bad_request("Search query required"))?;
    let results = schemes::search(q);
    ok(&json!({ "count": results.len(), "results": results }))
}
