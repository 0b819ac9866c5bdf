use axum::extract::{Extension, State};

use crate::db::models::DocumentType;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::AppState;

/// GET /api/document-types - catalog visible to any principal with at least
/// one active role.
pub async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Vec<DocumentType>> {
    state.gate.authorize(auth_user.principal_id, &[], &[]).await?;

    let document_types = state.directory.list_document_types().await?;
    Ok(ApiResponse::success(document_types))
}
