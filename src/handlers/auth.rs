use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
    extract::{Extension, State},
    http::HeaderMap,
    response::Json,
};
use chrono::Duration;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{extract_bearer, generate_jwt, verify_jwt, Claims, TokenKind};
use crate::config;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/login - authenticate credentials, return access + refresh tokens.
/// Role names in the token are advisory; they are read fresh here at signing
/// time and re-read from the store on every protected request.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Value> {
    let identity = state
        .directory
        .find_login(&body.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let parsed_hash = PasswordHash::new(&identity.password_hash).map_err(|e| {
        tracing::error!("Stored password hash for user {} is invalid: {}", identity.id, e);
        ApiError::internal_server_error("Stored credential is invalid")
    })?;

    if Argon2::default()
        .verify_password(body.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let principal = state.gate.principal(identity.id).await?;
    let roles = principal.active_role_names();

    let security = &config::config().security;
    let access_claims = Claims::access(
        principal.id,
        roles.clone(),
        Duration::hours(security.jwt_expiry_hours as i64),
    );
    let refresh_claims = Claims::refresh(
        principal.id,
        Duration::days(security.refresh_expiry_days as i64),
    );

    let token = generate_jwt(&access_claims, &security.jwt_secret)
        .map_err(|e| ApiError::internal_server_error(e.to_string()))?;
    let refresh_token = generate_jwt(&refresh_claims, &security.jwt_secret)
        .map_err(|e| ApiError::internal_server_error(e.to_string()))?;

    tracing::debug!("Login successful for user {} ({})", principal.name, principal.id);

    Ok(ApiResponse::success(json!({
        "token": token,
        "refresh_token": refresh_token,
        "expires_in": security.jwt_expiry_hours * 3600,
        "user": {
            "id": principal.id,
            "name": principal.name,
            "roles": roles,
        }
    })))
}

/// POST /auth/refresh - exchange a bearer refresh token for a new access
/// token. Current roles are re-fetched before signing so revocations take
/// effect even while a refresh token is still valid.
pub async fn refresh(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Value> {
    let security = &config::config().security;

    let token = extract_bearer(&headers)?;
    let claims = verify_jwt(&token, &security.jwt_secret, TokenKind::Refresh)?;

    let principal = state.gate.principal(claims.sub).await?;
    let roles = principal.active_role_names();

    let access_claims = Claims::access(
        principal.id,
        roles,
        Duration::hours(security.jwt_expiry_hours as i64),
    );
    let new_token = generate_jwt(&access_claims, &security.jwt_secret)
        .map_err(|e| ApiError::internal_server_error(e.to_string()))?;

    Ok(ApiResponse::success(json!({
        "token": new_token,
        "expires_in": security.jwt_expiry_hours * 3600,
    })))
}

/// GET /api/auth/whoami - the caller's fresh effective access.
pub async fn whoami(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Value> {
    let ctx = state.gate.authorize(auth_user.principal_id, &[], &[]).await?;

    Ok(ApiResponse::success(json!({
        "id": ctx.principal.id,
        "name": ctx.principal.name,
        "roles": ctx.access.roles,
        "permissions": ctx.access.permissions,
        "regional_id": ctx.assignment.regional_id,
        "center_ids": ctx.assignment.center_ids(),
    })))
}
