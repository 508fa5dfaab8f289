use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{sample_stories, FarmStory, NewStory, StoryError, StoryFilter, StoryStore};

/// Process-local story list; contents are lost on restart
pub struct MemoryStore {
    stories: RwLock<Vec<FarmStory>>,
}

impl MemoryStore {
    pub fn new(stories: Vec<FarmStory>) -> Self {
        Self {
            stories: RwLock::new(stories),
        }
    }

    pub fn seeded() -> Self {
        Self::new(sample_stories(Utc::now()))
    }

    async fn bump(&self, id: Uuid, counter: fn(&mut FarmStory) -> &mut i64) -> Option<i64> {
        let mut stories = self.stories.write().await;
        let story = stories.iter_mut().find(|s| s.id == id)?;
        let value = counter(story);
        *value += 1;
        Some(*value)
    }
}

fn newest_first(mut stories: Vec<FarmStory>) -> Vec<FarmStory> {
    stories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    stories
}

#[async_trait]
impl StoryStore for MemoryStore {
    async fn feed(&self, limit: usize) -> Result<Vec<FarmStory>, StoryError> {
        let stories = self.stories.read().await.clone();
        let mut stories = newest_first(stories);
        stories.truncate(limit);
        Ok(stories)
    }

    async fn get(&self, id: Uuid) -> Result<Option<FarmStory>, StoryError> {
        Ok(self.stories.read().await.iter().find(|s| s.id == id).cloned())
    }

    async fn like(&self, id: Uuid) -> Result<Option<i64>, StoryError> {
        Ok(self.bump(id, |s| &mut s.likes).await)
    }

    async fn increment_view(&self, id: Uuid) -> Result<Option<i64>, StoryError> {
        Ok(self.bump(id, |s| &mut s.views).await)
    }

    async fn create(&self, story: NewStory) -> Result<FarmStory, StoryError> {
        let story = story.into_story(Utc::now());
        self.stories.write().await.insert(0, story.clone());
        Ok(story)
    }

    async fn trending(&self, limit: usize) -> Result<Vec<FarmStory>, StoryError> {
        let mut stories = self.stories.read().await.clone();
        stories.sort_by(|a, b| b.views.cmp(&a.views));
        stories.truncate(limit);
        Ok(stories)
    }

    async fn search(&self, filter: &StoryFilter) -> Result<Vec<FarmStory>, StoryError> {
        let stories = self
            .stories
            .read()
            .await
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        Ok(newest_first(stories))
    }

    async fn by_username(&self, username: &str) -> Result<Vec<FarmStory>, StoryError> {
        let stories = self
            .stories
            .read()
            .await
            .iter()
            .filter(|s| s.username == username)
            .cloned()
            .collect();
        Ok(newest_first(stories))
    }
}
