//! Token issuing/decoding and password hashing for the three account roles

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Owner,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Owner => write!(f, "owner"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id in the role's table
    pub id: i32,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
    #[error("failed to sign token: {0}")]
    Signing(String),
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

pub fn issue_token(role: Role, id: i32, secret: &str, ttl_hours: i64) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        id,
        role,
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(ttl_hours)).timestamp() as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Signing(e.to_string()))
}

/// Decode and validate a bearer token for `expected` role.
pub fn decode_token(token: &str, secret: &str, expected: Role) -> Result<Claims, AuthError> {
    let validation = Validation::new(Algorithm::HS256);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::Expired,
        _ => AuthError::Invalid,
    })?;

    if data.claims.role != expected {
        return Err(AuthError::Invalid);
    }

    Ok(data.claims)
}

/// bcrypt is CPU-bound, so hashing runs on the blocking pool.
pub async fn hash_password(password: String, cost: u32) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "user-secret";

    #[test]
    fn test_token_round_trip() {
        let token = issue_token(Role::User, 42, SECRET, 24).unwrap();
        let claims = decode_token(&token, SECRET, Role::User).unwrap();
        assert_eq!(claims.id, 42);
        assert_eq!(claims.role, Role::User);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_rejected_with_other_secret() {
        let token = issue_token(Role::User, 1, SECRET, 24).unwrap();
        let err = decode_token(&token, "owner-secret", Role::User).unwrap_err();
        assert!(matches!(err, AuthError::Invalid));
    }

    #[test]
    fn test_token_rejected_for_other_role() {
        let token = issue_token(Role::Owner, 1, SECRET, 24).unwrap();
        let err = decode_token(&token, SECRET, Role::User).unwrap_err();
        assert!(matches!(err, AuthError::Invalid));
    }

    #[test]
    fn test_expired_token() {
        // Past the default 60s validation leeway
        let token = issue_token(Role::User, 1, SECRET, -2).unwrap();
        let err = decode_token(&token, SECRET, Role::User).unwrap_err();
        assert!(matches!(err, AuthError::Expired));
    }

    #[test]
    fn test_garbage_token() {
        let err = decode_token("not-a-jwt", SECRET, Role::User).unwrap_err();
        assert!(matches!(err, AuthError::Invalid));
    }

    #[tokio::test]
    async fn test_password_hash_and_verify() {
        let hash = hash_password("hunter22".to_string(), 4).await.unwrap();
        assert_ne!(hash, "hunter22");
        assert!(verify_password("hunter22".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("wrong".to_string(), hash).await.unwrap());
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Owner.to_string(), "owner");
    }
}
