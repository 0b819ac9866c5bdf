use axum::extract::{Extension, Path, State};
use uuid::Uuid;

use crate::authz::{ROLE_ADMIN, ROLE_CENTER_ADMIN, ROLE_REGIONAL_DIRECTOR};
use crate::db::models::UserSummary;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::AppState;

const MANAGEMENT_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_REGIONAL_DIRECTOR, ROLE_CENTER_ADMIN];

/// GET /api/users - users under the caller's scope. Requires a management
/// role or the manage-users permission; rows are then filtered to the
/// caller's organizational subtree.
pub async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Vec<UserSummary>> {
    let ctx = state
        .gate
        .authorize(auth_user.principal_id, MANAGEMENT_ROLES, &["manage-users"])
        .await?;
    let filter = state.gate.list_filter(&ctx);

    let users = state.directory.list_users(&filter).await?;
    Ok(ApiResponse::success(users))
}

/// GET /api/users/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<UserSummary> {
    state
        .gate
        .authorize(auth_user.principal_id, MANAGEMENT_ROLES, &["manage-users"])
        .await?;

    let user = state
        .directory
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;
    Ok(ApiResponse::success(user))
}
