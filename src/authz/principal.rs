use std::collections::BTreeSet;

use uuid::Uuid;

use super::error::AuthError;

/// System-reserved role names the scope rules key off.
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_REGIONAL_DIRECTOR: &str = "director-regional";
pub const ROLE_CENTER_ADMIN: &str = "administrator-center";
pub const ROLE_REVIEWER: &str = "reviewer";

/// One role assignment as loaded from the store. The assignment is active
/// only when both the user-role row and the role itself are active.
#[derive(Debug, Clone)]
pub struct RoleGrant {
    pub name: String,
    pub is_active: bool,
    pub permissions: Vec<String>,
}

/// One center assignment, carrying the center's regional for scope checks.
#[derive(Debug, Clone)]
pub struct CenterAssignment {
    pub center_id: Uuid,
    pub regional_id: Uuid,
    pub is_active: bool,
}

/// The authenticated actor, materialized per request from a fresh store
/// load. Never built from token claims: role membership can be revoked
/// between token issuance and use.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: Uuid,
    pub name: String,
    pub regional_id: Option<Uuid>,
    pub roles: Vec<RoleGrant>,
    pub direct_permissions: Vec<String>,
    pub centers: Vec<CenterAssignment>,
}

/// Derived, never cached across requests: the deduplicated union of role
/// names and permission names applicable to a principal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveAccess {
    pub roles: BTreeSet<String>,
    pub permissions: BTreeSet<String>,
}

impl EffectiveAccess {
    pub fn is_admin(&self) -> bool {
        self.roles.contains(ROLE_ADMIN)
    }

    pub fn has_any_role(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.roles.contains(*name))
    }

    pub fn has_any_permission(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.permissions.contains(*name))
    }
}

/// The organizational assignment a scope decision is made against:
/// home regional plus active (center, regional) pairs.
#[derive(Debug, Clone, Default)]
pub struct OrgAssignment {
    pub regional_id: Option<Uuid>,
    pub centers: Vec<(Uuid, Uuid)>,
}

impl OrgAssignment {
    pub fn has_center(&self, center_id: Uuid) -> bool {
        self.centers.iter().any(|(id, _)| *id == center_id)
    }

    /// Whether any assigned center belongs to the given regional.
    pub fn covers_regional(&self, regional_id: Uuid) -> bool {
        self.centers.iter().any(|(_, rid)| *rid == regional_id)
    }

    pub fn center_ids(&self) -> Vec<Uuid> {
        self.centers.iter().map(|(id, _)| *id).collect()
    }

    pub fn regional_ids(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = self.centers.iter().map(|(_, rid)| *rid).collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

impl Principal {
    /// Resolves the effective role-name and permission-name sets.
    ///
    /// Hard stop: a principal with zero active role assignments is always
    /// unauthorized, regardless of directly-granted permissions.
    pub fn effective_access(&self) -> Result<EffectiveAccess, AuthError> {
        let active_roles: Vec<&RoleGrant> =
            self.roles.iter().filter(|role| role.is_active).collect();

        if active_roles.is_empty() {
            return Err(AuthError::NoActiveRoles);
        }

        let mut access = EffectiveAccess::default();
        for role in active_roles {
            access.roles.insert(role.name.clone());
            for permission in &role.permissions {
                access.permissions.insert(permission.clone());
            }
        }
        for permission in &self.direct_permissions {
            access.permissions.insert(permission.clone());
        }

        Ok(access)
    }

    /// Names of active role assignments, for advisory token claims.
    pub fn active_role_names(&self) -> Vec<String> {
        self.roles
            .iter()
            .filter(|role| role.is_active)
            .map(|role| role.name.clone())
            .collect()
    }

    /// The organizational assignment used by scope checks. Only active
    /// center assignments participate.
    pub fn assignment(&self) -> OrgAssignment {
        OrgAssignment {
            regional_id: self.regional_id,
            centers: self
                .centers
                .iter()
                .filter(|center| center.is_active)
                .map(|center| (center.center_id, center.regional_id))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(name: &str, active: bool, permissions: &[&str]) -> RoleGrant {
        RoleGrant {
            name: name.to_string(),
            is_active: active,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn principal(roles: Vec<RoleGrant>, direct: &[&str]) -> Principal {
        Principal {
            id: Uuid::new_v4(),
            name: "test".to_string(),
            regional_id: None,
            roles,
            direct_permissions: direct.iter().map(|p| p.to_string()).collect(),
            centers: Vec::new(),
        }
    }

    #[test]
    fn permissions_are_deduplicated_across_roles_and_direct_grants() {
        let p = principal(
            vec![
                role("reviewer", true, &["view-documents", "manage-reviews"]),
                role("administrator-center", true, &["view-documents", "manage-centers"]),
            ],
            &["manage-reviews", "export-reports"],
        );

        let access = p.effective_access().unwrap();
        assert_eq!(
            access.permissions,
            ["view-documents", "manage-reviews", "manage-centers", "export-reports"]
                .iter()
                .map(|s| s.to_string())
                .collect()
        );
        assert_eq!(access.roles.len(), 2);
    }

    #[test]
    fn aggregation_is_order_independent() {
        let a = role("reviewer", true, &["p1", "p2"]);
        let b = role("administrator-center", true, &["p2", "p3"]);

        let forward = principal(vec![a.clone(), b.clone()], &[]).effective_access().unwrap();
        let reverse = principal(vec![b, a], &[]).effective_access().unwrap();

        assert_eq!(forward, reverse);
    }

    #[test]
    fn zero_active_roles_is_a_hard_stop_even_with_direct_permissions() {
        let p = principal(vec![], &["manage-users"]);
        assert!(matches!(p.effective_access(), Err(AuthError::NoActiveRoles)));

        let p = principal(vec![role("reviewer", false, &["p1"])], &["manage-users"]);
        assert!(matches!(p.effective_access(), Err(AuthError::NoActiveRoles)));
    }

    #[test]
    fn inactive_role_contributes_nothing() {
        let p = principal(
            vec![
                role("reviewer", true, &["p1"]),
                role("admin", false, &["p2"]),
            ],
            &[],
        );

        let access = p.effective_access().unwrap();
        assert!(!access.is_admin());
        assert!(!access.permissions.contains("p2"));
        assert!(access.permissions.contains("p1"));
    }

    #[test]
    fn assignment_excludes_inactive_centers() {
        let c1 = Uuid::new_v4();
        let c2 = Uuid::new_v4();
        let r1 = Uuid::new_v4();

        let mut p = principal(vec![role("reviewer", true, &[])], &[]);
        p.centers = vec![
            CenterAssignment { center_id: c1, regional_id: r1, is_active: true },
            CenterAssignment { center_id: c2, regional_id: r1, is_active: false },
        ];

        let assignment = p.assignment();
        assert!(assignment.has_center(c1));
        assert!(!assignment.has_center(c2));
        assert!(assignment.covers_regional(r1));
        assert_eq!(assignment.regional_ids(), vec![r1]);
    }
}
