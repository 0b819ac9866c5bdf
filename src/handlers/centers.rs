use axum::{
    extract::{Extension, Path, State},
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::authz::{AccessMode, ScopeTarget, ROLE_ADMIN, ROLE_REGIONAL_DIRECTOR};
use crate::db::models::Center;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::AppState;

/// GET /api/centers - centers visible to the caller.
pub async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Vec<Center>> {
    let ctx = state.gate.authorize(auth_user.principal_id, &[], &[]).await?;
    let filter = state.gate.list_filter(&ctx);

    let centers = state.directory.list_centers(&filter).await?;
    Ok(ApiResponse::success(centers))
}

/// GET /api/centers/:id - single center, scope-checked.
pub async fn get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Center> {
    let ctx = state.gate.authorize(auth_user.principal_id, &[], &[]).await?;
    state
        .gate
        .ensure_scope(&ctx, ScopeTarget::Center(id), AccessMode::Read, false)
        .await?;

    let center = state
        .directory
        .get_center(id)
        .await?
        .ok_or_else(|| ApiError::not_found("center not found"))?;
    Ok(ApiResponse::success(center))
}

#[derive(Debug, Deserialize)]
pub struct CreateCenterRequest {
    pub name: String,
    pub regional_id: Option<Uuid>,
}

/// POST /api/centers - create a center under a regional. The regional id is
/// a required scope target: absence is a 400-class caller bug, not an
/// authorization failure.
pub async fn create(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateCenterRequest>,
) -> ApiResult<Center> {
    let target = ScopeTarget::required_regional(body.regional_id)?;

    let ctx = state
        .gate
        .authorize(
            auth_user.principal_id,
            &[ROLE_ADMIN, ROLE_REGIONAL_DIRECTOR],
            &["manage-centers"],
        )
        .await?;
    state
        .gate
        .ensure_scope(&ctx, target, AccessMode::Write, false)
        .await?;

    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("Center name must not be empty"));
    }

    let center = state.directory.create_center(name, target.id()).await?;
    Ok(ApiResponse::created(center))
}
