// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::authz::AuthError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::InternalServerError(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code()
        })
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

/// Exhaustive mapping of the authorization taxonomy to HTTP statuses.
/// Caller-visible detail is preserved for 4xx kinds; server-side conditions
/// are logged and masked.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthenticated(msg) => ApiError::unauthorized(msg),
            AuthError::InvalidToken(msg) => {
                ApiError::unauthorized(format!("Invalid token: {}", msg))
            }
            AuthError::UserNotFound => ApiError::forbidden("User not found or inactive"),
            AuthError::NoActiveRoles => ApiError::forbidden("User has no active roles"),
            AuthError::AccessDenied(msg) => ApiError::forbidden(msg),
            AuthError::ScopeDenied(msg) => ApiError::forbidden(msg),
            AuthError::InsufficientPermissions(msg) => ApiError::forbidden(msg),
            AuthError::MissingParameter(name) => {
                ApiError::bad_request(format!("Missing required parameter: {}", name))
            }
            AuthError::ResourceNotFound(what) => {
                ApiError::not_found(format!("{} not found", what))
            }
            AuthError::DataIntegrity(msg) => {
                tracing::error!("Data integrity error during authorization: {}", msg);
                ApiError::internal_server_error("Data integrity error")
            }
            AuthError::Storage(e) => {
                // Don't expose internal storage errors to clients
                tracing::error!("Storage error during authorization: {}", e);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AuthError) -> u16 {
        ApiError::from(err).status_code()
    }

    #[test]
    fn taxonomy_maps_to_the_expected_status_classes() {
        assert_eq!(status_of(AuthError::Unauthenticated("x".into())), 401);
        assert_eq!(status_of(AuthError::InvalidToken("x".into())), 401);
        assert_eq!(status_of(AuthError::UserNotFound), 403);
        assert_eq!(status_of(AuthError::NoActiveRoles), 403);
        assert_eq!(status_of(AuthError::AccessDenied("x".into())), 403);
        assert_eq!(status_of(AuthError::ScopeDenied("x".into())), 403);
        assert_eq!(status_of(AuthError::InsufficientPermissions("x".into())), 403);
        assert_eq!(status_of(AuthError::MissingParameter("id")), 400);
        assert_eq!(status_of(AuthError::ResourceNotFound("center")), 404);
        assert_eq!(status_of(AuthError::DataIntegrity("x".into())), 500);
        assert_eq!(status_of(AuthError::Storage(sqlx::Error::RowNotFound)), 500);
    }

    #[test]
    fn missing_parameter_is_not_confusable_with_scope_denial() {
        let missing = ApiError::from(AuthError::MissingParameter("regional_id"));
        let denied = ApiError::from(AuthError::ScopeDenied("nope".into()));

        assert_eq!(missing.status_code(), 400);
        assert_eq!(denied.status_code(), 403);
        assert_ne!(missing.error_code(), denied.error_code());
    }

    #[test]
    fn error_body_has_the_envelope_fields() {
        let body = ApiError::forbidden("no").to_json();
        assert_eq!(body["error"], true);
        assert_eq!(body["code"], "FORBIDDEN");
        assert_eq!(body["message"], "no");
    }
}
