use async_trait::async_trait;
use uuid::Uuid;

use crate::db::models::{Center, DocumentType, Regional, RoleSummary, UserSummary};

use super::error::AuthError;
use super::principal::Principal;
use super::scope::ScopeFilter;

/// Credential material for the login flow.
#[derive(Debug, Clone)]
pub struct LoginIdentity {
    pub id: Uuid,
    pub password_hash: String,
}

/// Read-only port the authorization core needs from the backing store.
///
/// Every decision re-reads membership fresh; nothing here is cached across
/// requests. Implementations must resolve only active users.
#[async_trait]
pub trait AccessStore: Send + Sync {
    /// Loads a principal with role assignments, direct permission grants,
    /// and organizational assignments. `None` when the id does not resolve
    /// to an active user.
    async fn load_principal(&self, id: Uuid) -> Result<Option<Principal>, AuthError>;

    /// Resolves the regional a center belongs to. `None` when the center
    /// does not exist.
    async fn center_regional(&self, center_id: Uuid) -> Result<Option<Uuid>, AuthError>;
}

/// Read/write port for the administrative resource surface. List operations
/// take the caller's scope filter so non-admin callers never see rows
/// outside their organizational subtree.
#[async_trait]
pub trait Directory: Send + Sync {
    async fn ping(&self) -> Result<(), AuthError>;

    async fn find_login(&self, email: &str) -> Result<Option<LoginIdentity>, AuthError>;

    async fn list_regionals(&self, filter: &ScopeFilter) -> Result<Vec<Regional>, AuthError>;
    async fn get_regional(&self, id: Uuid) -> Result<Option<Regional>, AuthError>;
    async fn create_regional(&self, name: &str) -> Result<Regional, AuthError>;

    async fn list_centers(&self, filter: &ScopeFilter) -> Result<Vec<Center>, AuthError>;
    async fn get_center(&self, id: Uuid) -> Result<Option<Center>, AuthError>;
    async fn create_center(&self, name: &str, regional_id: Uuid) -> Result<Center, AuthError>;

    async fn list_users(&self, filter: &ScopeFilter) -> Result<Vec<UserSummary>, AuthError>;
    async fn get_user(&self, id: Uuid) -> Result<Option<UserSummary>, AuthError>;

    async fn list_roles(&self) -> Result<Vec<RoleSummary>, AuthError>;
    async fn list_document_types(&self) -> Result<Vec<DocumentType>, AuthError>;
}
