use uuid::Uuid;

use super::error::AuthError;
use super::principal::{
    EffectiveAccess, OrgAssignment, ROLE_CENTER_ADMIN, ROLE_REGIONAL_DIRECTOR, ROLE_REVIEWER,
};
use super::store::AccessStore;

/// The organizational resource a scope check targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeTarget {
    Regional(Uuid),
    Center(Uuid),
}

impl ScopeTarget {
    /// A regional target that the route requires. Absence is a caller bug
    /// (400-class), distinct from the authorization failures (403-class).
    pub fn required_regional(id: Option<Uuid>) -> Result<Self, AuthError> {
        id.map(Self::Regional)
            .ok_or(AuthError::MissingParameter("regional_id"))
    }

    /// A center target that the route requires.
    pub fn required_center(id: Option<Uuid>) -> Result<Self, AuthError> {
        id.map(Self::Center)
            .ok_or(AuthError::MissingParameter("center_id"))
    }

    pub fn id(self) -> Uuid {
        match self {
            Self::Regional(id) | Self::Center(id) => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

/// Row filter for list endpoints, derived with the same precedence as the
/// single-resource check. `Nothing` must produce zero rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeFilter {
    /// No restriction (admin).
    All,
    /// Rows under the given regional (regional director).
    Regional(Uuid),
    /// Rows under the caller's assigned centers (center admin / reviewer).
    /// `regional_ids` are the deduplicated regionals of those centers, so
    /// regional listings can apply the same restriction.
    Centers {
        center_ids: Vec<Uuid>,
        regional_ids: Vec<Uuid>,
    },
    /// Any other role composition: leak nothing.
    Nothing,
}

/// Derives the list filter for a caller. Consistent with `check_scope`:
/// same precedence order, same role-to-scope mapping. A regional director
/// with no home regional filters to `Nothing`; the single-resource check
/// reports that condition as a data-integrity error instead.
pub fn scope_filter(access: &EffectiveAccess, assignment: &OrgAssignment) -> ScopeFilter {
    if access.is_admin() {
        return ScopeFilter::All;
    }
    if access.has_any_role(&[ROLE_REGIONAL_DIRECTOR]) {
        return match assignment.regional_id {
            Some(regional_id) => ScopeFilter::Regional(regional_id),
            None => ScopeFilter::Nothing,
        };
    }
    if access.has_any_role(&[ROLE_CENTER_ADMIN, ROLE_REVIEWER]) {
        return ScopeFilter::Centers {
            center_ids: assignment.center_ids(),
            regional_ids: assignment.regional_ids(),
        };
    }
    ScopeFilter::Nothing
}

/// Decides whether the caller's organizational assignment covers the target
/// resource. Fixed precedence, first match wins:
///
/// 1. `admin` allows unconditionally, before any existence lookup.
/// 2. Regional targets: director matches the home regional; center-level
///    roles match through an assigned center in that regional (or through
///    the route's read-bypass for read-only operations).
/// 3. Center targets: director matches through the center's regional
///    (looked up here, the only path that touches the store); center-level
///    roles match on direct membership.
///
/// Any other role composition is not eligible for the resource type at all.
pub async fn check_scope(
    store: &dyn AccessStore,
    access: &EffectiveAccess,
    assignment: &OrgAssignment,
    target: ScopeTarget,
    mode: AccessMode,
    read_bypass: bool,
) -> Result<(), AuthError> {
    if access.is_admin() {
        return Ok(());
    }

    match target {
        ScopeTarget::Regional(regional_id) => {
            if access.has_any_role(&[ROLE_REGIONAL_DIRECTOR]) {
                if assignment.regional_id == Some(regional_id) {
                    Ok(())
                } else {
                    Err(AuthError::ScopeDenied(format!(
                        "regional {regional_id} is outside the caller's regional"
                    )))
                }
            } else if access.has_any_role(&[ROLE_CENTER_ADMIN, ROLE_REVIEWER]) {
                if mode == AccessMode::Read && read_bypass {
                    return Ok(());
                }
                if assignment.covers_regional(regional_id) {
                    Ok(())
                } else {
                    Err(AuthError::ScopeDenied(format!(
                        "no assigned center belongs to regional {regional_id}"
                    )))
                }
            } else {
                Err(AuthError::InsufficientPermissions(
                    "caller's roles do not grant regional-level access".to_string(),
                ))
            }
        }
        ScopeTarget::Center(center_id) => {
            if access.has_any_role(&[ROLE_REGIONAL_DIRECTOR]) {
                let home = assignment.regional_id.ok_or_else(|| {
                    AuthError::DataIntegrity(
                        "regional director has no home regional assigned".to_string(),
                    )
                })?;
                let regional_id = store
                    .center_regional(center_id)
                    .await?
                    .ok_or(AuthError::ResourceNotFound("center"))?;
                if regional_id == home {
                    Ok(())
                } else {
                    Err(AuthError::ScopeDenied(format!(
                        "center {center_id} belongs to another regional"
                    )))
                }
            } else if access.has_any_role(&[ROLE_CENTER_ADMIN, ROLE_REVIEWER]) {
                if assignment.has_center(center_id) {
                    Ok(())
                } else {
                    Err(AuthError::ScopeDenied(format!(
                        "center {center_id} is not among the caller's centers"
                    )))
                }
            } else {
                Err(AuthError::InsufficientPermissions(
                    "caller's roles do not grant center-level access".to_string(),
                ))
            }
        }
    }
}
