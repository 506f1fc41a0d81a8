use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use scholaris_core::{AccessMode, PaginationMeta, SystemRole};
use scholaris_models::{
    AssignRoleDto, AuthorizationCheckRequest, AuthorizationCheckResponse,
    CategoryPermissionsResponse, CreateUserDto, LoginRequest, LoginResponse,
    PaginatedUsersResponse, PermissionCatalogResponse, PermissionCategoryResponse, PermissionInfo,
    ProfileResponse, RoleAssignmentRecord, RoleChangeResponse, RoleTemplateResponse, User,
};

use crate::modules::auth::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::get_me,
        crate::modules::auth::controller::check_my_permissions,
        crate::modules::permissions::controller::get_permissions,
        crate::modules::permissions::controller::get_category_permissions,
        crate::modules::roles::controller::get_roles,
        crate::modules::roles::controller::get_role,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::assign_user_role,
        crate::modules::users::controller::get_user_role_history,
    ),
    components(
        schemas(
            SystemRole,
            AccessMode,
            User,
            CreateUserDto,
            AssignRoleDto,
            RoleChangeResponse,
            RoleAssignmentRecord,
            PaginatedUsersResponse,
            PaginationMeta,
            LoginRequest,
            LoginResponse,
            ProfileResponse,
            AuthorizationCheckRequest,
            AuthorizationCheckResponse,
            PermissionInfo,
            PermissionCategoryResponse,
            PermissionCatalogResponse,
            CategoryPermissionsResponse,
            RoleTemplateResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and the caller's own permissions"),
        (name = "Permissions", description = "The permission catalogue"),
        (name = "Roles", description = "Predefined role templates"),
        (name = "Users", description = "Accounts and role assignment")
    ),
    info(
        title = "Scholaris API",
        version = "0.1.0",
        description = "Permission-based access control for school administration.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/api/auth/login",
            "/api/auth/me",
            "/api/auth/me/check",
            "/api/permissions",
            "/api/permissions/categories/{category}",
            "/api/roles",
            "/api/roles/{role}",
            "/api/users",
            "/api/users/{id}",
            "/api/users/{id}/role",
            "/api/users/{id}/role-history",
        ] {
            assert!(paths.contains(&expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
