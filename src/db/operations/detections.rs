use deadpool_postgres::Pool;

use crate::db::{
    error::Result,
    types::{DiseaseDetection, NewDetection},
};

pub async fn insert(pool: &Pool, detection: NewDetection) -> Result<DiseaseDetection> {
    let conn = pool.get().await?;
    let row = conn
        .query_one(
            "INSERT INTO disease_detections
                (user_id, image_path, disease_name, confidence, recommendations)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
            &[
                &detection.user_id,
                &detection.image_path,
                &detection.disease_name,
                &detection.confidence,
                &detection.recommendations,
            ],
        )
        .await?;
    Ok(DiseaseDetection::from(&row))
}

/// Newest first
pub async fn list_for_user(pool: &Pool, user_id: i32) -> Result<Vec<DiseaseDetection>> {
    let conn = pool.get().await?;
    let rows = conn
        .query(
            "SELECT * FROM disease_detections
             WHERE user_id = $1
             ORDER BY detected_at DESC, id DESC",
            &[&user_id],
        )
        .await?;
    Ok(rows.iter().map(DiseaseDetection::from).collect())
}

pub async fn count_for_user(pool: &Pool, user_id: i32) -> Result<i64> {
    let conn = pool.get().await?;
    let row = conn
        .query_one(
            "SELECT COUNT(*) FROM disease_detections WHERE user_id = $1",
            &[&user_id],
        )
        .await?;
    Ok(row.get(0))
}
