use axum::Json;
use axum::extract::Path;
use scholaris_core::AppError;
use scholaris_models::RoleTemplateResponse;

use super::service::RoleService;
use crate::modules::auth::controller::ErrorResponse;

/// The five predefined role templates
#[utoipa::path(
    get,
    path = "/api/roles",
    responses(
        (status = 200, description = "Role templates", body = Vec<RoleTemplateResponse>),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing role:view", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Roles"
)]
pub async fn get_roles() -> Json<Vec<RoleTemplateResponse>> {
    Json(RoleService::list_roles())
}

/// One role template by key
#[utoipa::path(
    get,
    path = "/api/roles/{role}",
    params(
        ("role" = String, Path, description = "Role key, e.g. `teacher`")
    ),
    responses(
        (status = 200, description = "Role template", body = RoleTemplateResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing role:view", body = ErrorResponse),
        (status = 404, description = "Unknown role", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Roles"
)]
pub async fn get_role(Path(role): Path<String>) -> Result<Json<RoleTemplateResponse>, AppError> {
    Ok(Json(RoleService::get_role(&role)?))
}
