use axum::extract::{Extension, State};

use crate::authz::ROLE_ADMIN;
use crate::db::models::RoleSummary;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::AppState;

/// GET /api/roles - role catalog. Role administration is global, so the
/// gate alone decides; there is no scope dimension.
pub async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Vec<RoleSummary>> {
    state
        .gate
        .authorize(auth_user.principal_id, &[ROLE_ADMIN], &["manage-roles"])
        .await?;

    let roles = state.directory.list_roles().await?;
    Ok(ApiResponse::success(roles))
}
