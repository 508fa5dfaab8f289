// /api/farmstories handlers

use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;
use warp::{Rejection, Reply};

use super::{from_body, ok};
use crate::error::ApiError;
use crate::state::SharedState;
use crate::stories::{
    views, NewStory, StoryError, StoryFilter, StoryView, FEED_LIMIT, TRENDING_LIMIT,
};

impl From<StoryError> for ApiError {
    fn from(err: StoryError) -> Self {
        match err {
            StoryError::Storage(e) => e.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StorySearchQuery {
    pub q: Option<String>,
    pub crop: Option<String>,
    pub location: Option<String>,
}

fn story_not_found() -> ApiError {
    ApiError::not_found("Story not found")
}

/// Ids that are not UUIDs cannot name a story
fn story_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| story_not_found())
}

pub async fn feed(state: SharedState) -> Result<impl Reply, Rejection> {
    let stories = views(state.stories.feed(FEED_LIMIT).await.map_err(ApiError::from)?);
    ok(&json!({ "total": stories.len(), "stories": stories }))
}

pub async fn story(id: String, state: SharedState) -> Result<impl Reply, Rejection> {
    let story = state
        .stories
        .get(story_id(&id)?)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(story_not_found)?;
    ok(&json!({ "story": views(vec![story]).pop() }))
}

pub async fn like(id: String, state: SharedState) -> Result<impl Reply, Rejection> {
    let likes = state
        .stories
        .like(story_id(&id)?)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(story_not_found)?;
    ok(&json!({ "likes": likes }))
}

pub async fn increment_view(id: String, state: SharedState) -> Result<impl Reply, Rejection> {
    let views = state
        .stories
        .increment_view(story_id(&id)?)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(story_not_found)?;
    ok(&json!({ "views": views }))
}

pub async fn upload(body: Value, state: SharedState) -> Result<impl Reply, Rejection> {
    let new_story: NewStory = if body.is_null() {
        NewStory::default()
    } else {
        from_body(body)?
    };
    let story = state.stories.create(new_story).await.map_err(ApiError::from)?;
    let story = StoryView::new(story, chrono::Utc::now());
    ok(&json!({ "message": "FarmStory uploaded successfully!", "story": story }))
}

pub async fn trending(state: SharedState) -> Result<impl Reply, Rejection> {
    let stories = views(state.stories.trending(TRENDING_LIMIT).await.map_err(ApiError::from)?);
    ok(&json!({ "stories": stories }))
}

pub async fn search(query: StorySearchQuery, state: SharedState) -> Result<impl Reply, Rejection> {
    let filter = StoryFilter::new(
        query.q.as_deref(),
        query.crop.as_deref(),
        query.location.as_deref(),
    );
    let stories = views(state.stories.search(&filter).await.map_err(ApiError::from)?);
    ok(&json!({ "total": stories.len(), "stories": stories }))
}

pub async fn by_username(username: String, state: SharedState) -> Result<impl Reply, Rejection> {
    let stories = views(
        state
            .stories
            .by_username(&username)
            .await
            .map_err(ApiError::from)?,
    );
    ok(&json!({ "total": stories.len(), "stories": stories }))
}
