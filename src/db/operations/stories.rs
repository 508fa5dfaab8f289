use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::db::{error::Result, types::FarmStory};

pub async fn insert(pool: &Pool, story: &FarmStory) -> Result<FarmStory> {
    let conn = pool.get().await?;
    let row = conn
        .query_one(
            "INSERT INTO farm_stories
                (id, username, profile_pic, title, description, video_thumbnail, video_url,
                 likes, views, comments, duration, location, crop, tags, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING *",
            &[
                &story.id,
                &story.username,
                &story.profile_pic,
                &story.title,
                &story.description,
                &story.video_thumbnail,
                &story.video_url,
                &story.likes,
                &story.views,
                &story.comments,
                &story.duration,
                &story.location,
                &story.crop,
                &story.tags,
                &story.created_at,
            ],
        )
        .await?;
    Ok(FarmStory::from(&row))
}

pub async fn count(pool: &Pool) -> Result<i64> {
    let conn = pool.get().await?;
    let row = conn.query_one("SELECT COUNT(*) FROM farm_stories", &[]).await?;
    Ok(row.get(0))
}

pub async fn find(pool: &Pool, id: Uuid) -> Result<Option<FarmStory>> {
    let conn = pool.get().await?;
    let row = conn
        .query_opt("SELECT * FROM farm_stories WHERE id = $1", &[&id])
        .await?;
    Ok(row.as_ref().map(FarmStory::from))
}

/// Newest first
pub async fn latest(pool: &Pool, limit: i64) -> Result<Vec<FarmStory>> {
    let conn = pool.get().await?;
    let rows = conn
        .query(
            "SELECT * FROM farm_stories ORDER BY created_at DESC LIMIT $1",
            &[&limit],
        )
        .await?;
    Ok(rows.iter().map(FarmStory::from).collect())
}

pub async fn most_viewed(pool: &Pool, limit: i64) -> Result<Vec<FarmStory>> {
    let conn = pool.get().await?;
    let rows = conn
        .query(
            "SELECT * FROM farm_stories ORDER BY views DESC, created_at DESC LIMIT $1",
            &[&limit],
        )
        .await?;
    Ok(rows.iter().map(FarmStory::from).collect())
}

/// Returns the new like count, or `None` for an unknown story
pub async fn add_like(pool: &Pool, id: Uuid) -> Result<Option<i64>> {
    let conn = pool.get().await?;
    let row = conn
        .query_opt(
            "UPDATE farm_stories SET likes = likes + 1 WHERE id = $1 RETURNING likes",
            &[&id],
        )
        .await?;
    Ok(row.map(|r| r.get(0)))
}

pub async fn add_view(pool: &Pool, id: Uuid) -> Result<Option<i64>> {
    let conn = pool.get().await?;
    let row = conn
        .query_opt(
            "UPDATE farm_stories SET views = views + 1 WHERE id = $1 RETURNING views",
            &[&id],
        )
        .await?;
    Ok(row.map(|r| r.get(0)))
}

/// Each filter is an already lower-cased substring; `None` matches everything
pub async fn search(
    pool: &Pool,
    query: Option<&str>,
    crop: Option<&str>,
    location: Option<&str>,
) -> Result<Vec<FarmStory>> {
    let conn = pool.get().await?;
    let rows = conn
        .query(
            "SELECT * FROM farm_stories
             WHERE ($1::text IS NULL
                    OR strpos(lower(title), $1) > 0
                    OR strpos(lower(description), $1) > 0
                    OR EXISTS (SELECT 1 FROM unnest(tags) AS tag WHERE strpos(lower(tag), $1) > 0))
               AND ($2::text IS NULL OR strpos(lower(crop), $2) > 0)
               AND ($3::text IS NULL OR strpos(lower(location), $3) > 0)
             ORDER BY created_at DESC",
            &[&query, &crop, &location],
        )
        .await?;
    Ok(rows.iter().map(FarmStory::from).collect())
}

pub async fn by_username(pool: &Pool, username: &str) -> Result<Vec<FarmStory>> {
    let conn = pool.get().await?;
    let rows = conn
        .query(
            "SELECT * FROM farm_stories WHERE username = $1 ORDER BY created_at DESC",
            &[&username],
        )
        .await?;
    Ok(rows.iter().map(FarmStory::from).collect())
}
