//! Password hashing, session tokens and the bearer-token filters

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use warp::{Filter, Rejection};

use crate::db::{types::User, DbError};
use crate::error::ApiError;
use crate::state::{with_state, SharedState};

const TOKEN_LIFETIME_DAYS: i64 = 7;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token is missing")]
    MissingToken,

    /// Undecodable, expired, or pointing at a deleted user
    #[error("Token is invalid")]
    InvalidToken,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Storage(#[from] DbError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    /// Expiry as seconds since the epoch
    pub exp: i64,
}

/// Issues and checks HS256 session tokens
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Token for `user_id`, valid for seven days
    pub fn issue(&self, user_id: i32) -> Result<String, AuthError> {
        let claims = Claims {
            user_id,
            exp: (Utc::now() + Duration::days(TOKEN_LIFETIME_DAYS)).timestamp(),
        };
        self.encode(&claims)
    }

    fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Rejected session token");
                AuthError::InvalidToken
            })
    }
}

pub async fn hash_password(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// A malformed stored hash counts as a mismatch
pub async fn verify_password(password: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// The token part of an `Authorization` header; the `Bearer ` prefix is optional
pub fn extract_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

async fn resolve_user(state: &SharedState, header: Option<&str>) -> Result<User, AuthError> {
    let token = header.and_then(extract_token).ok_or(AuthError::MissingToken)?;
    let claims = state.tokens.verify(token)?;
    state
        .db
        .user_by_id(claims.user_id)
        .await?
        .ok_or(AuthError::InvalidToken)
}

/// Require a valid bearer token and extract its user
pub fn with_auth(
    state: SharedState,
) -> impl Filter<Extract = (User,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization")
        .and(with_state(state))
        .and_then(|header: Option<String>, state: SharedState| async move {
            resolve_user(&state, header.as_deref())
                .await
                .map_err(|e| Rejection::from(ApiError::from(e)))
        })
}

/// The caller's user when a valid token is present, otherwise `None`
pub fn optional_user(
    state: SharedState,
) -> impl Filter<Extract = (Option<User>,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization")
        .and(with_state(state))
        .and_then(|header: Option<String>, state: SharedState| async move {
            let user = match header {
                Some(header) => resolve_user(&state, Some(&header)).await.ok(),
                None => None,
            };
            Ok::<_, Rejection>(user)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        let tokens = TokenService::new("test-secret");
        let token = tokens.issue(42).unwrap();
        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.user_id, 42);

        let lifetime = claims.exp - Utc::now().timestamp();
        assert!(lifetime > 6 * 24 * 3600 && lifetime <= 7 * 24 * 3600);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_invalid() {
        let token = TokenService::new("one").issue(1).unwrap();
        assert!(matches!(
            TokenService::new("two").verify(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let tokens = TokenService::new("test-secret");
        let token = tokens
            .encode(&Claims {
                user_id: 1,
                exp: (Utc::now() - Duration::hours(2)).timestamp(),
            })
            .unwrap();
        assert!(matches!(tokens.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let tokens = TokenService::new("test-secret");
        assert!(tokens.verify("not.a.token").is_err());
    }

    #[test]
    fn test_extract_token() {
        assert_eq!(extract_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_token("abc.def"), Some("abc.def"));
        assert_eq!(extract_token("Bearer "), None);
        assert_eq!(extract_token(""), None);
    }

    #[tokio::test]
    async fn test_password_hash_and_verify() {
        let hash = hash_password("kisan123".to_string()).await.unwrap();
        assert_ne!(hash, "kisan123");
        assert!(verify_password("kisan123".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("wrong".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_against_malformed_hash() {
        assert!(!verify_password("x".to_string(), "not-a-hash".to_string())
            .await
            .unwrap());
    }
}
