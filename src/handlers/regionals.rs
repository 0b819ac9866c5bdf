use axum::{
    extract::{Extension, Path, State},
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::authz::{AccessMode, ScopeTarget, ROLE_ADMIN};
use crate::db::models::Regional;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::AppState;

/// GET /api/regionals - regionals visible to the caller. Admin sees all,
/// a director their own, center-level roles the regionals of their centers,
/// anything else nothing.
pub async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Vec<Regional>> {
    let ctx = state.gate.authorize(auth_user.principal_id, &[], &[]).await?;
    let filter = state.gate.list_filter(&ctx);

    let regionals = state.directory.list_regionals(&filter).await?;
    Ok(ApiResponse::success(regionals))
}

/// GET /api/regionals/:id - single regional, scope-checked. Center-level
/// roles may read regional metadata outside their own regional (read-bypass).
pub async fn get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Regional> {
    let ctx = state.gate.authorize(auth_user.principal_id, &[], &[]).await?;
    state
        .gate
        .ensure_scope(&ctx, ScopeTarget::Regional(id), AccessMode::Read, true)
        .await?;

    let regional = state
        .directory
        .get_regional(id)
        .await?
        .ok_or_else(|| ApiError::not_found("regional not found"))?;
    Ok(ApiResponse::success(regional))
}

#[derive(Debug, Deserialize)]
pub struct CreateRegionalRequest {
    pub name: String,
}

/// POST /api/regionals - regionals sit above every scope, so only the admin
/// role or an explicit management permission may create one.
pub async fn create(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateRegionalRequest>,
) -> ApiResult<Regional> {
    state
        .gate
        .authorize(auth_user.principal_id, &[ROLE_ADMIN], &["manage-regionals"])
        .await?;

    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("Regional name must not be empty"));
    }

    let regional = state.directory.create_regional(name).await?;
    Ok(ApiResponse::created(regional))
}
