//! # Scholaris Models
//!
//! Request and response types for the Scholaris API, plus the database rows
//! for user accounts and their role history.
//!
//! # Modules
//!
//! - [`auth`]: login and profile
//! - [`roles`]: permission catalogue, role templates, authorization checks
//! - [`users`]: accounts, role assignment, audit records

pub mod auth;
pub mod roles;
pub mod users;

pub use auth::{LoginRequest, LoginResponse, ProfileResponse};
pub use roles::{
    AuthorizationCheckRequest, AuthorizationCheckResponse, CategoryPermissionsResponse,
    PermissionCatalogResponse, PermissionCategoryResponse, PermissionInfo, RoleTemplateResponse,
};
pub use users::{
    AssignRoleDto, CreateUserDto, PaginatedUsersResponse, RoleAssignmentRecord,
    RoleChangeResponse, User, UserFilterParams, UserWithPassword,
};
