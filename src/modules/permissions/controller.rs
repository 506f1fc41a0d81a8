use axum::Json;
use axum::extract::Path;
use scholaris_models::{CategoryPermissionsResponse, PermissionCatalogResponse};

use super::service::PermissionService;
use crate::modules::auth::controller::ErrorResponse;

/// Full permission catalogue grouped by category
#[utoipa::path(
    get,
    path = "/api/permissions",
    responses(
        (status = 200, description = "Permission catalogue", body = PermissionCatalogResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing role:view", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Permissions"
)]
pub async fn get_permissions() -> Json<PermissionCatalogResponse> {
    Json(PermissionService::catalog())
}

/// Permissions of one category
///
/// The category may be given by slug (`student_management`) or display name.
/// An unknown category yields an empty list.
#[utoipa::path(
    get,
    path = "/api/permissions/categories/{category}",
    params(
        ("category" = String, Path, description = "Category slug or display name")
    ),
    responses(
        (status = 200, description = "Category members", body = CategoryPermissionsResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing role:view", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Permissions"
)]
pub async fn get_category_permissions(
    Path(category): Path<String>,
) -> Json<CategoryPermissionsResponse> {
    Json(PermissionService::category(&category))
}
