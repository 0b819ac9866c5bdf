use thiserror::Error;

/// Closed taxonomy of authorization failures. Every failure is terminal for
/// the current request; the HTTP boundary maps each kind to a status via
/// `From<AuthError> for ApiError`.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication required: {0}")]
    Unauthenticated(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("User not found or inactive")]
    UserNotFound,

    #[error("User has no active roles")]
    NoActiveRoles,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Out of scope: {0}")]
    ScopeDenied(String),

    #[error("Role not permitted for this resource type: {0}")]
    InsufficientPermissions(String),

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("{0} not found")]
    ResourceNotFound(&'static str),

    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}
