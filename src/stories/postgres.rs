use async_trait::async_trait;
use chrono::Utc;
use deadpool_postgres::Pool;
use tracing::info;
use uuid::Uuid;

use super::{sample_stories, FarmStory, NewStory, StoryError, StoryFilter, StoryStore};
use crate::db::operations::stories as ops;

/// Stories kept in the `farm_stories` table
#[derive(Clone)]
pub struct PgStoryStore {
    pool: Pool,
}

impl PgStoryStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Insert the sample stories when the table is empty
    pub async fn seed_if_empty(&self) -> Result<usize, StoryError> {
        if ops::count(&self.pool).await? > 0 {
            return Ok(0);
        }
        let samples = sample_stories(Utc::now());
        for story in &samples {
            ops::insert(&self.pool, story).await?;
        }
        info!(count = samples.len(), "Seeded farm stories");
        Ok(samples.len())
    }
}

fn as_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl StoryStore for PgStoryStore {
    async fn feed(&self, limit: usize) -> Result<Vec<FarmStory>, StoryError> {
        Ok(ops::latest(&self.pool, as_limit(limit)).await?)
    }

    async fn get(&self, id: Uuid) -> Result<Option<FarmStory>, StoryError> {
        Ok(ops::find(&self.pool, id).await?)
    }

    async fn like(&self, id: Uuid) -> Result<Option<i64>, StoryError> {
        Ok(ops::add_like(&self.pool, id).await?)
    }

    async fn increment_view(&self, id: Uuid) -> Result<Option<i64>, StoryError> {
        Ok(ops::add_view(&self.pool, id).await?)
    }

    async fn create(&self, story: NewStory) -> Result<FarmStory, StoryError> {
        let story = story.into_story(Utc::now());
        Ok(ops::insert(&self.pool, &story).await?)
    }

    async fn trending(&self, limit: usize) -> Result<Vec<FarmStory>, StoryError> {
        Ok(ops::most_viewed(&self.pool, as_limit(limit)).await?)
    }

    async fn search(&self, filter: &StoryFilter) -> Result<Vec<FarmStory>, StoryError> {
        Ok(ops::search(
            &self.pool,
            filter.query.as_deref(),
            filter.crop.as_deref(),
            filter.location.as_deref(),
        )
        .await?)
    }

    async fn by_username(&self, username: &str) -> Result<Vec<FarmStory>, StoryError> {
        Ok(ops::by_username(&self.pool, username).await?)
    }
}
