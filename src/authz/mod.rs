//! Authorization core: role/permission aggregation, scope validation, and
//! the access decision gate protected routes call.

pub mod error;
pub mod gate;
pub mod memory;
pub mod principal;
pub mod scope;
pub mod store;

pub use error::AuthError;
pub use gate::{AccessContext, AccessGate};
pub use memory::{MemoryState, MemoryStore};
pub use principal::{
    CenterAssignment, EffectiveAccess, OrgAssignment, Principal, RoleGrant, ROLE_ADMIN,
    ROLE_CENTER_ADMIN, ROLE_REGIONAL_DIRECTOR, ROLE_REVIEWER,
};
pub use scope::{check_scope, scope_filter, AccessMode, ScopeFilter, ScopeTarget};
pub use store::{AccessStore, Directory, LoginIdentity};
