use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_postgres::Row;
use uuid::Uuid;

/// A registered account
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub language_preference: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Row> for User {
    fn from(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            username: row.get("username"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            phone: row.get("phone"),
            language_preference: row.get("language_preference"),
            created_at: row.get("created_at"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub language_preference: String,
}

/// Farm details attached one-to-one to a user
#[derive(Debug, Clone, Default, Serialize)]
pub struct FarmerProfile {
    pub id: i32,
    pub user_id: i32,
    pub full_name: Option<String>,
    pub farm_location: Option<String>,
    pub farm_size: Option<f64>,
    pub crops_grown: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub pin_code: Option<String>,
    #[serde(skip_serializing)]
    pub aadhar_number: Option<String>,
}

impl From<&Row> for FarmerProfile {
    fn from(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            user_id: row.get("user_id"),
            full_name: row.get("full_name"),
            farm_location: row.get("farm_location"),
            farm_size: row.get("farm_size"),
            crops_grown: row.get("crops_grown"),
            state: row.get("state"),
            district: row.get("district"),
            pin_code: row.get("pin_code"),
            aadhar_number: row.get("aadhar_number"),
        }
    }
}

impl FarmerProfile {
    /// Number of comma-separated crops, ignoring blanks
    pub fn crops_variety(&self) -> usize {
        self.crops_grown
            .as_deref()
            .map(|crops| crops.split(',').filter(|c| !c.trim().is_empty()).count())
            .unwrap_or(0)
    }
}

/// Partial update; `None` leaves a column untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub farm_location: Option<String>,
    pub farm_size: Option<f64>,
    pub crops_grown: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub pin_code: Option<String>,
    pub aadhar_number: Option<String>,
}

/// A marketplace listing
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: i32,
    pub seller_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub price_per_unit: Option<f64>,
    pub image_url: Option<String>,
    pub location: Option<String>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Row> for Product {
    fn from(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            seller_id: row.get("seller_id"),
            name: row.get("name"),
            description: row.get("description"),
            category: row.get("category"),
            quantity: row.get("quantity"),
            unit: row.get("unit"),
            price_per_unit: row.get("price_per_unit"),
            image_url: row.get("image_url"),
            location: row.get("location"),
            is_available: row.get("is_available"),
            created_at: row.get("created_at"),
        }
    }
}

/// Logged classifier result
#[derive(Debug, Clone, Serialize)]
pub struct DiseaseDetection {
    pub id: i32,
    pub user_id: Option<i32>,
    pub image_path: Option<String>,
    pub disease_name: Option<String>,
    pub confidence: Option<f64>,
    pub recommendations: Option<Value>,
    pub detected_at: DateTime<Utc>,
}

impl From<&Row> for DiseaseDetection {
    fn from(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            user_id: row.get("user_id"),
            image_path: row.get("image_path"),
            disease_name: row.get("disease_name"),
            confidence: row.get("confidence"),
            recommendations: row.get("recommendations"),
            detected_at: row.get("detected_at"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewDetection {
    pub user_id: i32,
    pub image_path: String,
    pub disease_name: String,
    pub confidence: f64,
    pub recommendations: Value,
}

/// One stored chatbot exchange
#[derive(Debug, Clone, Serialize)]
pub struct ChatRecord {
    pub id: i32,
    pub user_id: Option<i32>,
    pub message: String,
    pub response: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Row> for ChatRecord {
    fn from(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            user_id: row.get("user_id"),
            message: row.get("message"),
            response: row.get("response"),
            language: row.get("language"),
            created_at: row.get("created_at"),
        }
    }
}

/// A short farm video post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmStory {
    pub id: Uuid,
    pub username: String,
    pub profile_pic: String,
    pub title: String,
    pub description: String,
    pub video_thumbnail: String,
    pub video_url: String,
    pub likes: i64,
    pub views: i64,
    pub comments: i64,
    pub duration: String,
    pub location: String,
    pub crop: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Row> for FarmStory {
    fn from(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            username: row.get("username"),
            profile_pic: row.get("profile_pic"),
            title: row.get("title"),
            description: row.get("description"),
            video_thumbnail: row.get("video_thumbnail"),
            video_url: row.get("video_url"),
            likes: row.get("likes"),
            views: row.get("views"),
            comments: row.get("comments"),
            duration: row.get("duration"),
            location: row.get("location"),
            crop: row.get("crop"),
            tags: row.get("tags"),
            created_at: row.get("created_at"),
        }
    }
}

/// Per-user dashboard numbers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UserStats {
    pub products_count: i64,
    pub detections_count: i64,
    pub total_revenue: i64,
    pub crops_variety: usize,
}
