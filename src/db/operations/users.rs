use deadpool_postgres::Pool;

use crate::db::{
    error::Result,
    types::{NewUser, User},
};

const USER_COLUMNS: &str =
    "id, username, email, password_hash, phone, language_preference, created_at";

/// Insert a user together with an empty farmer profile.
///
/// Both rows are written in one transaction. A taken username or email
/// surfaces as `DbError::Conflict` carrying the violated constraint name.
pub async fn create_user_with_profile(pool: &Pool, user: NewUser) -> Result<User> {
    let mut conn = pool.get().await?;
    let tx = conn.transaction().await?;

    let sql = format!(
        "INSERT INTO users (username, email, password_hash, phone, language_preference)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {}",
        USER_COLUMNS
    );
    let row = tx
        .query_one(
            &sql,
            &[
                &user.username,
                &user.email,
                &user.password_hash,
                &user.phone,
                &user.language_preference,
            ],
        )
        .await?;
    let created = User::from(&row);

    tx.execute(
        "INSERT INTO farmer_profiles (user_id) VALUES ($1)",
        &[&created.id],
    )
    .await?;
    tx.commit().await?;

    Ok(created)
}

pub async fn find_by_id(pool: &Pool, id: i32) -> Result<Option<User>> {
    let conn = pool.get().await?;
    let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
    let row = conn.query_opt(&sql, &[&id]).await?;
    Ok(row.as_ref().map(User::from))
}

pub async fn find_by_username(pool: &Pool, username: &str) -> Result<Option<User>> {
    let conn = pool.get().await?;
    let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
    let row = conn.query_opt(&sql, &[&username]).await?;
    Ok(row.as_ref().map(User::from))
}

pub async fn username_exists(pool: &Pool, username: &str) -> Result<bool> {
    let conn = pool.get().await?;
    let row = conn
        .query_one(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
            &[&username],
        )
        .await?;
    Ok(row.get(0))
}

pub async fn email_exists(pool: &Pool, email: &str) -> Result<bool> {
    let conn = pool.get().await?;
    let row = conn
        .query_one(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
            &[&email],
        )
        .await?;
    Ok(row.get(0))
}

/// Update phone and/or language; `None` keeps the stored value
pub async fn update_account(
    pool: &Pool,
    id: i32,
    phone: Option<&str>,
    language_preference: Option<&str>,
) -> Result<Option<User>> {
    let conn = pool.get().await?;
    let sql = format!(
        "UPDATE users
         SET phone = COALESCE($2, phone),
             language_preference = COALESCE($3, language_preference)
         WHERE id = $1
         RETURNING {}",
        USER_COLUMNS
    );
    let row = conn
        .query_opt(&sql, &[&id, &phone, &language_preference])
        .await?;
    Ok(row.as_ref().map(User::from))
}

pub async fn update_password_hash(pool: &Pool, id: i32, password_hash: &str) -> Result<bool> {
    let conn = pool.get().await?;
    let updated = conn
        .execute(
            "UPDATE users SET password_hash = $2 WHERE id = $1",
            &[&id, &password_hash],
        )
        .await?;
    Ok(updated == 1)
}

/// Delete a user. Profile and products go with it through ON DELETE CASCADE;
/// detections and chat history keep their rows with a null user.
pub async fn delete_user(pool: &Pool, id: i32) -> Result<bool> {
    let conn = pool.get().await?;
    let deleted = conn
        .execute("DELETE FROM users WHERE id = $1", &[&id])
        .await?;
    Ok(deleted == 1)
}
