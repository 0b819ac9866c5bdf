use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::authz::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Principal id. The only claim authorization trusts.
    pub sub: Uuid,
    pub kind: TokenKind,
    /// Advisory only: role names at signing time. Every authorization
    /// decision re-reads current roles from the store.
    pub roles: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn access(sub: Uuid, roles: Vec<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub,
            kind: TokenKind::Access,
            roles,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }

    pub fn refresh(sub: Uuid, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub,
            kind: TokenKind::Refresh,
            roles: Vec::new(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT secret")]
    InvalidSecret,
}

pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Verifies signature and expiry, and that the token is of the expected
/// kind (an access token is not accepted where a refresh token is required,
/// and vice versa).
pub fn verify_jwt(token: &str, secret: &str, expected: TokenKind) -> Result<Claims, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidToken("JWT secret not configured".to_string()));
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    if token_data.claims.kind != expected {
        return Err(AuthError::InvalidToken("wrong token type".to_string()));
    }

    Ok(token_data.claims)
}

/// Extracts the token from the Authorization header. The `Bearer ` scheme
/// prefix is required on every path, including refresh; a raw token is
/// rejected.
pub fn extract_bearer(headers: &HeaderMap) -> Result<String, AuthError> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| AuthError::Unauthenticated("Missing Authorization header".to_string()))?;

    let auth_str = auth_header.to_str().map_err(|_| {
        AuthError::Unauthenticated("Invalid Authorization header format".to_string())
    })?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.to_string()),
        Some(_) => Err(AuthError::Unauthenticated("Empty bearer token".to_string())),
        None => Err(AuthError::Unauthenticated(
            "Authorization header must use the Bearer scheme".to_string(),
        )),
    }
}
