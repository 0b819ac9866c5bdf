//! In-memory implementation of the store ports, used as a test double and
//! for running the service without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::models::{Center, DocumentType, Regional, RoleSummary, UserSummary};

use super::error::AuthError;
use super::principal::Principal;
use super::scope::ScopeFilter;
use super::store::{AccessStore, Directory, LoginIdentity};

/// Seed data for a [`MemoryStore`]. Populate the fields directly.
#[derive(Debug, Default)]
pub struct MemoryState {
    pub principals: HashMap<Uuid, Principal>,
    pub logins: HashMap<String, LoginIdentity>,
    pub center_regionals: HashMap<Uuid, Uuid>,
    pub regionals: Vec<Regional>,
    pub centers: Vec<Center>,
    pub users: Vec<UserSummary>,
    pub user_centers: HashMap<Uuid, Vec<Uuid>>,
    pub roles: Vec<RoleSummary>,
    pub document_types: Vec<DocumentType>,
}

pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new(state: MemoryState) -> Self {
        Self { state: RwLock::new(state) }
    }

    fn user_matches(state: &MemoryState, user: &UserSummary, filter: &ScopeFilter) -> bool {
        match filter {
            ScopeFilter::All => true,
            ScopeFilter::Regional(regional_id) => {
                if user.regional_id == Some(*regional_id) {
                    return true;
                }
                state
                    .user_centers
                    .get(&user.id)
                    .map(|centers| {
                        centers.iter().any(|center_id| {
                            state.center_regionals.get(center_id) == Some(regional_id)
                        })
                    })
                    .unwrap_or(false)
            }
            ScopeFilter::Centers { center_ids, .. } => state
                .user_centers
                .get(&user.id)
                .map(|centers| centers.iter().any(|id| center_ids.contains(id)))
                .unwrap_or(false),
            ScopeFilter::Nothing => false,
        }
    }
}

#[async_trait]
impl AccessStore for MemoryStore {
    async fn load_principal(&self, id: Uuid) -> Result<Option<Principal>, AuthError> {
        Ok(self.state.read().await.principals.get(&id).cloned())
    }

    async fn center_regional(&self, center_id: Uuid) -> Result<Option<Uuid>, AuthError> {
        Ok(self.state.read().await.center_regionals.get(&center_id).copied())
    }
}

#[async_trait]
impl Directory for MemoryStore {
    async fn ping(&self) -> Result<(), AuthError> {
        Ok(())
    }

    async fn find_login(&self, email: &str) -> Result<Option<LoginIdentity>, AuthError> {
        Ok(self.state.read().await.logins.get(email).cloned())
    }

    async fn list_regionals(&self, filter: &ScopeFilter) -> Result<Vec<Regional>, AuthError> {
        let state = self.state.read().await;
        let regionals = state
            .regionals
            .iter()
            .filter(|regional| match filter {
                ScopeFilter::All => true,
                ScopeFilter::Regional(id) => regional.id == *id,
                ScopeFilter::Centers { regional_ids, .. } => regional_ids.contains(&regional.id),
                ScopeFilter::Nothing => false,
            })
            .cloned()
            .collect();
        Ok(regionals)
    }

    async fn get_regional(&self, id: Uuid) -> Result<Option<Regional>, AuthError> {
        Ok(self
            .state
            .read()
            .await
            .regionals
            .iter()
            .find(|regional| regional.id == id)
            .cloned())
    }

    async fn create_regional(&self, name: &str) -> Result<Regional, AuthError> {
        let regional = Regional {
            id: Uuid::new_v4(),
            name: name.to_string(),
            is_active: true,
        };
        self.state.write().await.regionals.push(regional.clone());
        Ok(regional)
    }

    async fn list_centers(&self, filter: &ScopeFilter) -> Result<Vec<Center>, AuthError> {
        let state = self.state.read().await;
        let centers = state
            .centers
            .iter()
            .filter(|center| match filter {
                ScopeFilter::All => true,
                ScopeFilter::Regional(id) => center.regional_id == *id,
                ScopeFilter::Centers { center_ids, .. } => center_ids.contains(&center.id),
                ScopeFilter::Nothing => false,
            })
            .cloned()
            .collect();
        Ok(centers)
    }

    async fn get_center(&self, id: Uuid) -> Result<Option<Center>, AuthError> {
        Ok(self
            .state
            .read()
            .await
            .centers
            .iter()
            .find(|center| center.id == id)
            .cloned())
    }

    async fn create_center(&self, name: &str, regional_id: Uuid) -> Result<Center, AuthError> {
        let mut state = self.state.write().await;
        if !state.regionals.iter().any(|regional| regional.id == regional_id) {
            return Err(AuthError::ResourceNotFound("regional"));
        }
        let center = Center {
            id: Uuid::new_v4(),
            name: name.to_string(),
            regional_id,
            is_active: true,
        };
        state.centers.push(center.clone());
        state.center_regionals.insert(center.id, regional_id);
        Ok(center)
    }

    async fn list_users(&self, filter: &ScopeFilter) -> Result<Vec<UserSummary>, AuthError> {
        let state = self.state.read().await;
        let users = state
            .users
            .iter()
            .filter(|user| Self::user_matches(&state, user, filter))
            .cloned()
            .collect();
        Ok(users)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<UserSummary>, AuthError> {
        Ok(self
            .state
            .read()
            .await
            .users
            .iter()
            .find(|user| user.id == id)
            .cloned())
    }

    async fn list_roles(&self) -> Result<Vec<RoleSummary>, AuthError> {
        Ok(self.state.read().await.roles.clone())
    }

    async fn list_document_types(&self) -> Result<Vec<DocumentType>, AuthError> {
        Ok(self.state.read().await.document_types.clone())
    }
}
