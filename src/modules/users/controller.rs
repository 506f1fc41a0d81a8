use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use scholaris_core::AppError;
use scholaris_models::{
    AssignRoleDto, CreateUserDto, PaginatedUsersResponse, RoleAssignmentRecord,
    RoleChangeResponse, User, UserFilterParams,
};
use tracing::instrument;
use uuid::Uuid;

use super::service::UserService;
use crate::middleware::auth::{RequireRoleAssign, RequireRoleView, RequireUserCreate, RequireUserView};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Create a user account with its initial role
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing user:create, or role exceeds caller's authority", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, auth, dto))]
pub async fn create_user(
    State(state): State<AppState>,
    RequireUserCreate(auth): RequireUserCreate,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = UserService::create_user(&state.db, &auth, dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// List users, optionally filtered by role
#[utoipa::path(
    get,
    path = "/api/users",
    params(
        ("role" = Option<String>, Query, description = "Only users holding this role"),
        ("page" = Option<i64>, Query, description = "Page number (default 1)"),
        ("per_page" = Option<i64>, Query, description = "Items per page (default 20, max 100)")
    ),
    responses(
        (status = 200, description = "Page of users", body = PaginatedUsersResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing user:view", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, _auth))]
pub async fn get_users(
    State(state): State<AppState>,
    RequireUserView(_auth): RequireUserView,
    Query(filters): Query<UserFilterParams>,
) -> Result<Json<PaginatedUsersResponse>, AppError> {
    Ok(Json(UserService::get_users(&state.db, filters).await?))
}

/// Get one user
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User", body = User),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing user:view", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, _auth))]
pub async fn get_user(
    State(state): State<AppState>,
    RequireUserView(_auth): RequireUserView,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    Ok(Json(UserService::get_user(&state.db, id).await?))
}

/// Change a user's role
///
/// Assigning the role the user already holds succeeds without recording a
/// change.
#[utoipa::path(
    put,
    path = "/api/users/{id}/role",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = AssignRoleDto,
    responses(
        (status = 200, description = "Role assigned", body = RoleChangeResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing role:assign, self-assignment, or escalation", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Unknown role", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, auth, dto))]
pub async fn assign_user_role(
    State(state): State<AppState>,
    RequireRoleAssign(auth): RequireRoleAssign,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<AssignRoleDto>,
) -> Result<Json<RoleChangeResponse>, AppError> {
    let response = UserService::assign_role(&state.db, &auth, id, dto.role).await?;
    Ok(Json(response))
}

/// Role assignment history of a user, newest first
#[utoipa::path(
    get,
    path = "/api/users/{id}/role-history",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Assignment records", body = Vec<RoleAssignmentRecord>),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing role:view", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, _auth))]
pub async fn get_user_role_history(
    State(state): State<AppState>,
    RequireRoleView(_auth): RequireRoleView,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<RoleAssignmentRecord>>, AppError> {
    Ok(Json(UserService::get_role_history(&state.db, id).await?))
}
