//! # Scholaris Core
//!
//! The access-control core of the Scholaris school administration service,
//! plus the small set of shared utilities every other crate leans on.
//!
//! - [`permissions`]: the closed permission catalogue and its categories
//! - [`roles`]: the five predefined role templates
//! - [`access`]: pure authorization predicates and the endpoint gate
//! - [`errors`]: application error type with HTTP response conversion
//! - [`pagination`]: pagination helpers for list endpoints
//! - [`password`]: bcrypt password hashing
//!
//! # Example
//!
//! ```ignore
//! use scholaris_core::{AccessMode, Permission, SystemRole, authorize};
//!
//! assert!(authorize(SystemRole::Parent, &[Permission::GradingView], AccessMode::Any));
//! assert!(!authorize(SystemRole::Teacher, &[Permission::FinancialView], AccessMode::All));
//! ```

pub mod access;
pub mod errors;
pub mod pagination;
pub mod password;
pub mod permissions;
pub mod roles;

// Re-export commonly used types at crate root
pub use access::{
    AccessMode, PermissionSet, TokenCheck, authorize, authorize_permission, can_grant_role,
    check_tokens, has_all_permissions, has_any_permission, has_permission, has_permission_token,
};
pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
pub use permissions::{
    Permission, PermissionCategory, UnknownPermission, all_permissions, permissions_for_category,
    verify_registry,
};
pub use roles::{RoleTemplate, SystemRole, UnknownRole, role_templates};
