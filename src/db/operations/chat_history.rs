use deadpool_postgres::Pool;

use crate::db::{error::Result, types::ChatRecord};

pub async fn insert(
    pool: &Pool,
    user_id: i32,
    message: &str,
    response: &str,
    language: &str,
) -> Result<ChatRecord> {
    let conn = pool.get().await?;
    let row = conn
        .query_one(
            "INSERT INTO chat_history (user_id, message, response, language)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
            &[&user_id, &message, &response, &language],
        )
        .await?;
    Ok(ChatRecord::from(&row))
}

/// The user's latest `limit` exchanges, newest first
pub async fn recent_for_user(pool: &Pool, user_id: i32, limit: i64) -> Result<Vec<ChatRecord>> {
    let conn = pool.get().await?;
    let rows = conn
        .query(
            "SELECT * FROM chat_history
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2",
            &[&user_id, &limit],
        )
        .await?;
    Ok(rows.iter().map(ChatRecord::from).collect())
}
