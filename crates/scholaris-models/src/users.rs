//! User accounts and the role-assignment audit trail.

use scholaris_core::{PaginationMeta, PaginationParams, SystemRole};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A user account. Each account holds exactly one role.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: SystemRole,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// A user row together with its password hash. Never serialized.
#[derive(FromRow, Debug, Clone)]
pub struct UserWithPassword {
    #[sqlx(flatten)]
    pub user: User,
    pub password: String,
}

/// DTO for creating a new account with its initial role.
///
/// The caller must be able to grant `role`; see
/// [`scholaris_core::can_grant_role`].
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub role: SystemRole,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct AssignRoleDto {
    pub role: SystemRole,
}

/// Result of a role change. `changed` is false when the user already held the role.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct RoleChangeResponse {
    pub user: User,
    pub previous_role: SystemRole,
    pub changed: bool,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UserFilterParams {
    pub role: Option<SystemRole>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct PaginatedUsersResponse {
    pub data: Vec<User>,
    pub meta: PaginationMeta,
}

/// One entry of the append-only role history. Roles are kept as the stored
/// keys so history survives template changes.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct RoleAssignmentRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    /// `None` for the role set when the account was created
    pub previous_role: Option<String>,
    pub new_role: String,
    /// `None` when assigned outside the API (CLI bootstrap)
    pub assigned_by: Option<Uuid>,
    pub assigned_at: chrono::DateTime<chrono::Utc>,
}
