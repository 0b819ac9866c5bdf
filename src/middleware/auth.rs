use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{extract_bearer, verify_jwt, Claims, TokenKind};
use crate::config;
use crate::error::ApiError;

/// Authenticated principal identity extracted from the JWT. Carries only the
/// trusted id plus the advisory role names; roles and permissions used for
/// decisions are always re-read from the store by the gate.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub principal_id: Uuid,
    pub advisory_roles: Vec<String>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            principal_id: claims.sub,
            advisory_roles: claims.roles,
        }
    }
}

/// JWT authentication middleware: validates the bearer access token and
/// injects the principal identity into the request. Role/permission loading
/// is deliberately deferred to the gate so stale claims are never trusted.
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(&headers)?;
    let claims = verify_jwt(&token, &config::config().security.jwt_secret, TokenKind::Access)?;

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}
