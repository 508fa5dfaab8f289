// /api/profile handlers

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use warp::{Rejection, Reply};

use super::{created, from_body, ok, text_field};
use crate::auth::{hash_password, verify_password};
use crate::db::operations::ProductInsert;
use crate::db::types::{NewUser, ProfileUpdate, User};
use crate::db::DbError;
use crate::error::ApiError;
use crate::state::SharedState;

/// A failed unique insert names the field that collided
fn duplicate_account(err: DbError) -> ApiError {
    match err {
        DbError::Conflict(constraint) if constraint.contains("username") => {
            ApiError::bad_request("Username already exists")
        }
        DbError::Conflict(constraint) if constraint.contains("email") => {
            ApiError::bad_request("Email already exists")
        }
        other => other.into(),
    }
}

pub async fn register(body: Value, state: SharedState) -> Result<impl Reply, Rejection> {
    let (Some(username), Some(email), Some(password)) = (
        text_field(&body, "username"),
        text_field(&body, "email"),
        text_field(&body, "password"),
    ) else {
        return Err(ApiError::bad_request("Missing required fields").into());
    };

    if state.db.username_exists(username).await.map_err(ApiError::from)? {
        return Err(ApiError::bad_request("Username already exists").into());
    }
    if state.db.email_exists(email).await.map_err(ApiError::from)? {
        return Err(ApiError::bad_request("Email already exists").into());
    }

    let password_hash = hash_password(password.to_string())
        .await
        .map_err(ApiError::from)?;
    let user = state
        .db
        .create_user(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            phone: text_field(&body, "phone").map(str::to_string),
            language_preference: text_field(&body, "language").unwrap_or("en").to_string(),
        })
        .await
        .map_err(duplicate_account)?;

    info!(user_id = user.id, "Registered user");
    created(&json!({ "message": "User registered successfully", "user": user }))
}

pub async fn login(body: Value, state: SharedState) -> Result<impl Reply, Rejection> {
    let (Some(username), Some(password)) =
        (text_field(&body, "username"), text_field(&body, "password"))
    else {
        return Err(ApiError::bad_request("Username and password required").into());
    };

    let invalid = || ApiError::Unauthorized("Invalid credentials".to_string());
    let user = state
        .db
        .user_by_username(username)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(invalid)?;
    let matches = verify_password(password.to_string(), user.password_hash.clone())
        .await
        .map_err(ApiError::from)?;
    if !matches {
        return Err(invalid().into());
    }

    let token = state.tokens.issue(user.id).map_err(ApiError::from)?;
    ok(&json!({ "message": "Login successful", "token": token, "user": user }))
}

pub async fn me(user: User, state: SharedState) -> Result<impl Reply, Rejection> {
    let profile = state.db.profile_for(user.id).await.map_err(ApiError::from)?;
    ok(&json!({ "user": user, "profile": profile }))
}

pub async fn update(user: User, body: Value, state: SharedState) -> Result<impl Reply, Rejection> {
    let phone = text_field(&body, "phone").map(str::to_string);
    let language = text_field(&body, "language_preference").map(str::to_string);
    let profile_update: ProfileUpdate = if body.is_null() {
        ProfileUpdate::default()
    } else {
        from_body(body)?
    };

    let user = if phone.is_some() || language.is_some() {
        state
            .db
            .update_account(user.id, phone.as_deref(), language.as_deref())
            .await
            .map_err(ApiError::from)?
            .unwrap_or(user)
    } else {
        user
    };
    let profile = state
        .db
        .upsert_profile(user.id, &profile_update)
        .await
        .map_err(ApiError::from)?;

    ok(&json!({
        "message": "Profile updated successfully",
        "user": user,
        "profile": profile,
    }))
}

pub async fn change_password(
    user: User,
    body: Value,
    state: SharedState,
) -> Result<impl Reply, Rejection> {
    let (Some(old_password), Some(new_password)) = (
        text_field(&body, "old_password"),
        text_field(&body, "new_password"),
    ) else {
        return Err(ApiError::bad_request("Old and new passwords required").into());
    };

    let matches = verify_password(old_password.to_string(), user.password_hash.clone())
        .await
        .map_err(ApiError::from)?;
    if !matches {
        return Err(ApiError::Unauthorized("Incorrect old password".to_string()).into());
    }

    let hash = hash_password(new_password.to_string())
        .await
        .map_err(ApiError::from)?;
    state
        .db
        .update_password_hash(user.id, &hash)
        .await
        .map_err(ApiError::from)?;
    ok(&json!({ "message": "Password changed successfully" }))
}

pub async fn delete(user: User, state: SharedState) -> Result<impl Reply, Rejection> {
    state.db.delete_user(user.id).await.map_err(ApiError::from)?;
    info!(user_id = user.id, "Deleted account");
    ok(&json!({ "message": "Account deleted successfully" }))
}

pub async fn stats(user: User, state: SharedState) -> Result<impl Reply, Rejection> {
    let stats = state.db.stats_for(user.id).await.map_err(ApiError::from)?;
    ok(&json!({ "stats": stats }))
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub price_per_unit: Option<f64>,
    pub image_url: Option<String>,
    pub location: Option<String>,
}

impl ProductRequest {
    fn insert(&self) -> Result<ProductInsert<'_>, ApiError> {
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ApiError::bad_request("Product name is required"))?;
        Ok(ProductInsert {
            name,
            description: self.description.as_deref(),
            category: self.category.as_deref(),
            quantity: self.quantity,
            unit: self.unit.as_deref(),
            price_per_unit: self.price_per_unit,
            image_url: self.image_url.as_deref(),
            location: self.location.as_deref(),
        })
    }
}

pub async fn add_product(
    user: User,
    body: Value,
    state: SharedState,
) -> Result<impl Reply, Rejection> {
    let request: ProductRequest = if body.is_null() {
        ProductRequest::default()
    } else {
        from_body(body)?
    };
    let product = state
        .db
        .create_product(user.id, request.insert()?)
        .await
        .map_err(ApiError::from)?;
    created(&json!({ "message": "Product listed successfully", "product": product }))
}

pub async fn products(user: User, state: SharedState) -> Result<impl Reply, Rejection> {
    let products = state.db.products_for(user.id).await.map_err(ApiError::from)?;
    ok(&json!({ "count": products.len(), "products": products }))
}
