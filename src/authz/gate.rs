use std::sync::Arc;

use uuid::Uuid;

use super::error::AuthError;
use super::principal::{EffectiveAccess, OrgAssignment, Principal};
use super::scope::{check_scope, scope_filter, AccessMode, ScopeFilter, ScopeTarget};
use super::store::AccessStore;

/// Everything a route handler needs after the gate has let a request
/// through: the fresh principal, its effective sets, and its organizational
/// assignment for scope checks.
#[derive(Debug)]
pub struct AccessContext {
    pub principal: Principal,
    pub access: EffectiveAccess,
    pub assignment: OrgAssignment,
}

/// The two decision points every protected route calls: "does this caller
/// have an allowed role or an allowed permission" and "is this resource
/// within the caller's scope". Role/permission gating is coarse, scope
/// validation is fine; routes that need both run them in that order.
#[derive(Clone)]
pub struct AccessGate {
    store: Arc<dyn AccessStore>,
}

impl AccessGate {
    pub fn new(store: Arc<dyn AccessStore>) -> Self {
        Self { store }
    }

    /// Loads the principal fresh from the store. `UserNotFound` when the id
    /// does not resolve to an active user.
    pub async fn principal(&self, principal_id: Uuid) -> Result<Principal, AuthError> {
        self.store
            .load_principal(principal_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Role/permission gate. An empty allow-list means no constraint from
    /// that axis; the two axes combine with OR. The `admin` role overrides
    /// both axes, and a principal with zero active roles is rejected before
    /// either list is consulted.
    pub async fn authorize(
        &self,
        principal_id: Uuid,
        allowed_roles: &[&str],
        allowed_permissions: &[&str],
    ) -> Result<AccessContext, AuthError> {
        let principal = self.principal(principal_id).await?;
        let access = principal.effective_access()?;
        let assignment = principal.assignment();
        let ctx = AccessContext { principal, access, assignment };

        if ctx.access.is_admin() {
            return Ok(ctx);
        }

        let role_ok = allowed_roles.is_empty() || ctx.access.has_any_role(allowed_roles);
        let permission_ok =
            allowed_permissions.is_empty() || ctx.access.has_any_permission(allowed_permissions);

        if role_ok || permission_ok {
            Ok(ctx)
        } else {
            tracing::warn!(
                principal = %principal_id,
                required_roles = ?allowed_roles,
                required_permissions = ?allowed_permissions,
                "access denied by role/permission gate"
            );
            Err(AuthError::AccessDenied(
                "caller holds none of the required roles or permissions".to_string(),
            ))
        }
    }

    /// Scope check for a single resource.
    pub async fn ensure_scope(
        &self,
        ctx: &AccessContext,
        target: ScopeTarget,
        mode: AccessMode,
        read_bypass: bool,
    ) -> Result<(), AuthError> {
        check_scope(
            self.store.as_ref(),
            &ctx.access,
            &ctx.assignment,
            target,
            mode,
            read_bypass,
        )
        .await
    }

    /// Scope check where the route's target id is optional: absence means
    /// there is no scope to check.
    pub async fn ensure_scope_opt(
        &self,
        ctx: &AccessContext,
        target: Option<ScopeTarget>,
        mode: AccessMode,
        read_bypass: bool,
    ) -> Result<(), AuthError> {
        match target {
            Some(target) => self.ensure_scope(ctx, target, mode, read_bypass).await,
            None => Ok(()),
        }
    }

    /// Row filter for list endpoints, consistent with `ensure_scope`.
    pub fn list_filter(&self, ctx: &AccessContext) -> ScopeFilter {
        scope_filter(&ctx.access, &ctx.assignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::memory::{MemoryState, MemoryStore};
    use crate::authz::principal::{CenterAssignment, RoleGrant, ROLE_ADMIN, ROLE_REVIEWER};

    fn role(name: &str, permissions: &[&str]) -> RoleGrant {
        RoleGrant {
            name: name.to_string(),
            is_active: true,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn seed(roles: Vec<RoleGrant>, direct: &[&str]) -> (AccessGate, Uuid) {
        let id = Uuid::new_v4();
        let principal = Principal {
            id,
            name: "test".to_string(),
            regional_id: None,
            roles,
            direct_permissions: direct.iter().map(|p| p.to_string()).collect(),
            centers: vec![],
        };
        let mut state = MemoryState::default();
        state.principals.insert(id, principal);
        (AccessGate::new(Arc::new(MemoryStore::new(state))), id)
    }

    #[tokio::test]
    async fn reviewer_without_required_role_or_permission_is_denied() {
        let (gate, id) = seed(vec![role(ROLE_REVIEWER, &[])], &[]);

        let result = gate.authorize(id, &[ROLE_ADMIN], &["manage-users"]).await;
        assert!(matches!(result, Err(AuthError::AccessDenied(_))));
    }

    #[tokio::test]
    async fn one_matching_role_is_enough_with_zero_permission_overlap() {
        let (gate, id) = seed(
            vec![role(ROLE_REVIEWER, &[]), role("administrator-center", &[])],
            &[],
        );

        let result = gate
            .authorize(id, &[ROLE_REVIEWER], &["manage-documents"])
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn one_matching_permission_is_enough_with_zero_role_overlap() {
        let (gate, id) = seed(vec![role(ROLE_REVIEWER, &["manage-users"])], &[]);

        let result = gate.authorize(id, &[ROLE_ADMIN], &["manage-users"]).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn direct_permission_grants_participate_in_the_gate() {
        let (gate, id) = seed(vec![role(ROLE_REVIEWER, &[])], &["export-reports"]);

        let result = gate.authorize(id, &[ROLE_ADMIN], &["export-reports"]).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn admin_overrides_both_allow_lists() {
        let (gate, id) = seed(vec![role(ROLE_ADMIN, &[])], &[]);

        let result = gate
            .authorize(id, &["director-regional"], &["manage-documents"])
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn zero_active_roles_is_rejected_before_the_allow_lists() {
        let (gate, id) = seed(vec![], &["manage-users"]);

        let result = gate.authorize(id, &[], &["manage-users"]).await;
        assert!(matches!(result, Err(AuthError::NoActiveRoles)));
    }

    #[tokio::test]
    async fn empty_allow_lists_admit_any_principal_with_an_active_role() {
        let (gate, id) = seed(vec![role(ROLE_REVIEWER, &[])], &[]);

        assert!(gate.authorize(id, &[], &[]).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_principal_is_user_not_found() {
        let gate = AccessGate::new(Arc::new(MemoryStore::new(MemoryState::default())));

        let result = gate.authorize(Uuid::new_v4(), &[], &[]).await;
        assert!(matches!(result, Err(AuthError::UserNotFound)));
    }

    #[tokio::test]
    async fn optional_target_short_circuits_to_allow() {
        let (gate, id) = seed(vec![role(ROLE_REVIEWER, &[])], &[]);
        let ctx = gate.authorize(id, &[], &[]).await.unwrap();

        let result = gate
            .ensure_scope_opt(&ctx, None, AccessMode::Write, false)
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn context_assignment_feeds_the_list_filter() {
        let id = Uuid::new_v4();
        let center_id = Uuid::new_v4();
        let regional_id = Uuid::new_v4();
        let principal = Principal {
            id,
            name: "q".to_string(),
            regional_id: None,
            roles: vec![role(ROLE_REVIEWER, &[])],
            direct_permissions: vec![],
            centers: vec![CenterAssignment {
                center_id,
                regional_id,
                is_active: true,
            }],
        };
        let mut state = MemoryState::default();
        state.principals.insert(id, principal);
        let gate = AccessGate::new(Arc::new(MemoryStore::new(state)));

        let ctx = gate.authorize(id, &[], &[]).await.unwrap();
        assert_eq!(
            gate.list_filter(&ctx),
            ScopeFilter::Centers {
                center_ids: vec![center_id],
                regional_ids: vec![regional_id],
            }
        );
    }
}
