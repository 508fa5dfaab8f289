use deadpool_postgres::Pool;
use tracing::info;

use crate::db::error::Result;

/// Tables are created on startup when missing; existing data is left alone.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id                  SERIAL PRIMARY KEY,
    username            VARCHAR(80)  NOT NULL UNIQUE,
    email               VARCHAR(120) NOT NULL UNIQUE,
    password_hash       VARCHAR(255) NOT NULL,
    phone               VARCHAR(20),
    language_preference VARCHAR(10)  NOT NULL DEFAULT 'en',
    created_at          TIMESTAMPTZ  NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS farmer_profiles (
    id            SERIAL PRIMARY KEY,
    user_id       INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    full_name     VARCHAR(100),
    farm_location VARCHAR(200),
    farm_size     DOUBLE PRECISION,
    crops_grown   TEXT,
    state         VARCHAR(50),
    district      VARCHAR(50),
    pin_code      VARCHAR(10),
    aadhar_number VARCHAR(12)
);

CREATE TABLE IF NOT EXISTS products (
    id             SERIAL PRIMARY KEY,
    seller_id      INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name           VARCHAR(100) NOT NULL,
    description    TEXT,
    category       VARCHAR(50),
    quantity       DOUBLE PRECISION,
    unit           VARCHAR(20),
    price_per_unit DOUBLE PRECISION,
    image_url      VARCHAR(255),
    location       VARCHAR(200),
    is_available   BOOLEAN NOT NULL DEFAULT TRUE,
    created_at     TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS disease_detections (
    id              SERIAL PRIMARY KEY,
    user_id         INTEGER REFERENCES users(id) ON DELETE SET NULL,
    image_path      VARCHAR(255),
    disease_name    VARCHAR(100),
    confidence      DOUBLE PRECISION,
    recommendations JSONB,
    detected_at     TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS chat_history (
    id         SERIAL PRIMARY KEY,
    user_id    INTEGER REFERENCES users(id) ON DELETE SET NULL,
    message    TEXT NOT NULL,
    response   TEXT NOT NULL,
    language   VARCHAR(10) NOT NULL DEFAULT 'en',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS farm_stories (
    id              UUID PRIMARY KEY,
    username        TEXT NOT NULL,
    profile_pic     TEXT NOT NULL,
    title           TEXT NOT NULL,
    description     TEXT NOT NULL,
    video_thumbnail TEXT NOT NULL,
    video_url       TEXT NOT NULL,
    likes           BIGINT NOT NULL DEFAULT 0,
    views           BIGINT NOT NULL DEFAULT 0,
    comments        BIGINT NOT NULL DEFAULT 0,
    duration        TEXT NOT NULL,
    location        TEXT NOT NULL,
    crop            TEXT NOT NULL,
    tags            TEXT[] NOT NULL DEFAULT '{}',
    created_at      TIMESTAMPTZ NOT NULL DEFAULT now()
);
"#;

pub async fn ensure_schema(pool: &Pool) -> Result<()> {
    let conn = pool.get().await?;
    conn.batch_execute(SCHEMA_SQL).await?;
    info!("Database schema is ready");
    Ok(())
}
