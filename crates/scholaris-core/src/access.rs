//! Authorization predicates.
//!
//! Pure, total functions over a granted permission set. Nothing here fails or
//! touches shared mutable state; turning a `false` into a 403 is the caller's
//! job.
//!
//! Empty requirement lists are asymmetric on purpose: "any of nothing" is
//! `false`, "all of nothing" is `true`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::permissions::Permission;
use crate::roles::SystemRole;

/// A caller's effective permissions.
pub type PermissionSet = BTreeSet<Permission>;

/// How a list of required permissions is combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    /// At least one required permission must be granted.
    Any,
    /// Every required permission must be granted.
    #[default]
    All,
}

impl AccessMode {
    pub fn evaluate(self, granted: &PermissionSet, required: &[Permission]) -> bool {
        match self {
            AccessMode::Any => has_any_permission(granted, required),
            AccessMode::All => has_all_permissions(granted, required),
        }
    }
}

pub fn has_permission(granted: &PermissionSet, required: Permission) -> bool {
    granted.contains(&required)
}

/// `false` for an empty `required`.
pub fn has_any_permission(granted: &PermissionSet, required: &[Permission]) -> bool {
    required.iter().any(|p| granted.contains(p))
}

/// `true` for an empty `required`.
pub fn has_all_permissions(granted: &PermissionSet, required: &[Permission]) -> bool {
    required.iter().all(|p| granted.contains(p))
}

/// Membership test for a raw token from the wire. Unknown tokens are simply
/// not granted.
pub fn has_permission_token(granted: &PermissionSet, token: &str) -> bool {
    token
        .parse::<Permission>()
        .is_ok_and(|p| has_permission(granted, p))
}

/// Outcome of evaluating raw tokens against a granted set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCheck {
    pub allowed: bool,
    /// Requested tokens not granted, in request order. Unknown tokens land here.
    pub missing: Vec<String>,
}

/// [`AccessMode::evaluate`] for tokens that have not been parsed yet.
pub fn check_tokens<S: AsRef<str>>(
    granted: &PermissionSet,
    tokens: &[S],
    mode: AccessMode,
) -> TokenCheck {
    let missing: Vec<String> = tokens
        .iter()
        .map(AsRef::as_ref)
        .filter(|token| !has_permission_token(granted, token))
        .map(str::to_string)
        .collect();

    let allowed = match mode {
        AccessMode::Any => missing.len() < tokens.len(),
        AccessMode::All => missing.is_empty(),
    };

    TokenCheck { allowed, missing }
}

/// The endpoint gate: may a holder of `role` proceed?
pub fn authorize(role: SystemRole, required: &[Permission], mode: AccessMode) -> bool {
    mode.evaluate(role.permissions(), required)
}

pub fn authorize_permission(role: SystemRole, required: Permission) -> bool {
    has_permission(role.permissions(), required)
}

/// Whether `actor` may hand out `role`: only authority the actor already holds
/// can be granted.
pub fn can_grant_role(actor: SystemRole, role: SystemRole) -> bool {
    role.permissions().is_subset(actor.permissions())
}
