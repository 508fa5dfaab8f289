//! Farm story feed and its two storage backends

mod memory;
mod postgres;
mod samples;

pub use memory::MemoryStore;
pub use postgres::PgStoryStore;
pub use samples::sample_stories;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::db::DbError;
pub use crate::db::types::FarmStory;

pub const FEED_LIMIT: usize = 50;
pub const TRENDING_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum StoryError {
    #[error(transparent)]
    Storage(#[from] DbError),
}

/// Upload body; a missing or `null` field takes its default
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "StoryUpload")]
pub struct NewStory {
    pub username: String,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub location: String,
    pub crop: String,
    pub tags: Vec<String>,
    pub video_url: String,
}

impl Default for NewStory {
    fn default() -> Self {
        Self {
            username: "Anonymous".to_string(),
            title: "Untitled".to_string(),
            description: String::new(),
            duration: "0:30".to_string(),
            location: "India".to_string(),
            crop: "General".to_string(),
            tags: Vec::new(),
            video_url: String::new(),
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct StoryUpload {
    username: Option<String>,
    title: Option<String>,
    description: Option<String>,
    duration: Option<String>,
    location: Option<String>,
    crop: Option<String>,
    tags: Option<Vec<String>>,
    video_url: Option<String>,
}

impl From<StoryUpload> for NewStory {
    fn from(upload: StoryUpload) -> Self {
        let defaults = NewStory::default();
        Self {
            username: upload.username.unwrap_or(defaults.username),
            title: upload.title.unwrap_or(defaults.title),
            description: upload.description.unwrap_or(defaults.description),
            duration: upload.duration.unwrap_or(defaults.duration),
            location: upload.location.unwrap_or(defaults.location),
            crop: upload.crop.unwrap_or(defaults.crop),
            tags: upload.tags.unwrap_or(defaults.tags),
            video_url: upload.video_url.unwrap_or(defaults.video_url),
        }
    }
}

impl NewStory {
    pub fn into_story(self, now: DateTime<Utc>) -> FarmStory {
        FarmStory {
            id: Uuid::new_v4(),
            username: self.username,
            profile_pic: "👨‍🌾".to_string(),
            title: self.title,
            description: self.description,
            video_thumbnail: "🎥".to_string(),
            video_url: self.video_url,
            likes: 0,
            views: 0,
            comments: 0,
            duration: self.duration,
            location: self.location,
            crop: self.crop,
            tags: self.tags,
            created_at: now,
        }
    }
}

/// Search filters, lower-cased; empty parameters are dropped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoryFilter {
    pub query: Option<String>,
    pub crop: Option<String>,
    pub location: Option<String>,
}

impl StoryFilter {
    pub fn new(query: Option<&str>, crop: Option<&str>, location: Option<&str>) -> Self {
        let clean = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_lowercase)
        };
        Self {
            query: clean(query),
            crop: clean(crop),
            location: clean(location),
        }
    }

    pub fn matches(&self, story: &FarmStory) -> bool {
        let query_ok = self.query.as_deref().map_or(true, |q| {
            story.title.to_lowercase().contains(q)
                || story.description.to_lowercase().contains(q)
                || story.tags.iter().any(|t| t.to_lowercase().contains(q))
        });
        let crop_ok = self
            .crop
            .as_deref()
            .map_or(true, |c| story.crop.to_lowercase().contains(c));
        let location_ok = self
            .location
            .as_deref()
            .map_or(true, |l| story.location.to_lowercase().contains(l));
        query_ok && crop_ok && location_ok
    }
}

#[async_trait]
pub trait StoryStore: Send + Sync {
    /// Newest first
    async fn feed(&self, limit: usize) -> Result<Vec<FarmStory>, StoryError>;

    async fn get(&self, id: Uuid) -> Result<Option<FarmStory>, StoryError>;

    /// New like count, `None` when the story does not exist
    async fn like(&self, id: Uuid) -> Result<Option<i64>, StoryError>;

    /// New view count, `None` when the story does not exist
    async fn increment_view(&self, id: Uuid) -> Result<Option<i64>, StoryError>;

    async fn create(&self, story: NewStory) -> Result<FarmStory, StoryError>;

    /// Most viewed first
    async fn trending(&self, limit: usize) -> Result<Vec<FarmStory>, StoryError>;

    async fn search(&self, filter: &StoryFilter) -> Result<Vec<FarmStory>, StoryError>;

    async fn by_username(&self, username: &str) -> Result<Vec<FarmStory>, StoryError>;
}

/// A story as sent to clients, with its age as a label
#[derive(Debug, Clone, Serialize)]
pub struct StoryView {
    #[serde(flatten)]
    pub story: FarmStory,
    pub timestamp: String,
}

impl StoryView {
    pub fn new(story: FarmStory, now: DateTime<Utc>) -> Self {
        let timestamp = relative_time(story.created_at, now);
        Self { story, timestamp }
    }
}

pub fn views(stories: Vec<FarmStory>) -> Vec<StoryView> {
    let now = Utc::now();
    stories.into_iter().map(|s| StoryView::new(s, now)).collect()
}

fn ago(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}

/// "Just now", "5 minutes ago", "1 day ago", "3 weeks ago"
pub fn relative_time(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(created_at);
    if elapsed.num_minutes() < 1 {
        "Just now".to_string()
    } else if elapsed.num_hours() < 1 {
        ago(elapsed.num_minutes(), "minute")
    } else if elapsed.num_days() < 1 {
        ago(elapsed.num_hours(), "hour")
    } else if elapsed.num_weeks() < 1 {
        ago(elapsed.num_days(), "day")
    } else {
        ago(elapsed.num_weeks(), "week")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_relative_time_labels() {
        let now = Utc::now();
        assert_eq!(relative_time(now, now), "Just now");
        assert_eq!(relative_time(now + Duration::minutes(3), now), "Just now");
        assert_eq!(relative_time(now - Duration::seconds(59), now), "Just now");
        assert_eq!(relative_time(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(relative_time(now - Duration::minutes(45), now), "45 minutes ago");
        assert_eq!(relative_time(now - Duration::hours(2), now), "2 hours ago");
        assert_eq!(relative_time(now - Duration::days(1), now), "1 day ago");
        assert_eq!(relative_time(now - Duration::days(6), now), "6 days ago");
        assert_eq!(relative_time(now - Duration::days(7), now), "1 week ago");
        assert_eq!(relative_time(now - Duration::days(30), now), "4 weeks ago");
    }

    #[test]
    fn test_new_story_defaults() {
        let new: NewStory = serde_json::from_str("{\"title\": \"Millet\"}").unwrap();
        let story = new.into_story(Utc::now());
        assert_eq!(story.username, "Anonymous");
        assert_eq!(story.title, "Millet");
        assert_eq!(story.duration, "0:30");
        assert_eq!(story.location, "India");
        assert_eq!(story.crop, "General");
        assert_eq!((story.likes, story.views, story.comments), (0, 0, 0));
    }

    #[test]
    fn test_null_fields_take_defaults() {
        let new: NewStory = serde_json::from_str(
            r#"{"username": null, "title": "Drip irrigation", "tags": null, "crop": null}"#,
        )
        .unwrap();
        assert_eq!(new.username, "Anonymous");
        assert_eq!(new.title, "Drip irrigation");
        assert_eq!(new.crop, "General");
        assert!(new.tags.is_empty());
    }

    #[test]
    fn test_filter_matching() {
        let stories = sample_stories(Utc::now());
        let organic = StoryFilter::new(Some("ORGANIC"), None, None);
        let hits: Vec<&str> = stories
            .iter()
            .filter(|s| organic.matches(s))
            .map(|s| s.username.as_str())
            .collect();
        assert_eq!(
            hits,
            vec!["RajeshFarmer", "GreenThumbGita", "BioFarmBharat", "OrganicOdisha"]
        );

        let cotton_in_karnataka = StoryFilter::new(Some(""), Some("cotton"), Some("karna"));
        assert_eq!(cotton_in_karnataka.query, None);
        let hits: Vec<&FarmStory> = stories.iter().filter(|s| cotton_in_karnataka.matches(s)).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].username, "ModernKisan");
    }

    #[test]
    fn test_view_carries_timestamp() {
        let now = Utc::now();
        let story = NewStory::default().into_story(now - Duration::hours(5));
        let json = serde_json::to_value(StoryView::new(story, now)).unwrap();
        assert_eq!(json["timestamp"], "5 hours ago");
        assert_eq!(json["title"], "Untitled");
    }
}
