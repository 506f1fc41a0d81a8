use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use scholaris_auth::{Claims, verify_token};
use scholaris_core::{AccessMode, AppError, Permission, PermissionSet, SystemRole, access};
use uuid::Uuid;

use crate::state::AppState;

/// Extractor for an authenticated caller.
///
/// The token only identifies the caller. Their role is read from the database
/// on every request, so a reassignment applies at once even to tokens issued
/// before it.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub claims: Claims,
    pub user_id: Uuid,
    pub role: SystemRole,
}

impl AuthUser {
    /// Effective permissions of the caller's current role.
    pub fn permissions(&self) -> &'static PermissionSet {
        self.role.permissions()
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        access::has_permission(self.permissions(), permission)
    }

    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        access::has_any_permission(self.permissions(), permissions)
    }

    pub fn has_all_permissions(&self, permissions: &[Permission]) -> bool {
        access::has_all_permissions(self.permissions(), permissions)
    }

    pub fn authorize(&self, required: &[Permission], mode: AccessMode) -> bool {
        mode.evaluate(self.permissions(), required)
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = verify_token(token, &state.jwt_config)?;

        let user_id = claims
            .user_id()
            .ok_or_else(|| AppError::unauthorized("Invalid user ID in token"))?;

        let stored_role: Option<String> =
            sqlx::query_scalar("SELECT role FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&state.db)
                .await?;

        let role = stored_role
            .ok_or_else(|| AppError::unauthorized("User no longer exists"))?
            .parse::<SystemRole>()
            .map_err(AppError::internal)?;

        Ok(AuthUser {
            claims,
            user_id,
            role,
        })
    }
}

/// Declares an extractor that admits only callers holding one permission.
#[macro_export]
macro_rules! require_permission {
    ($name:ident, $permission:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = scholaris_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;

                let permission: scholaris_core::Permission = $permission;
                if !auth_user.has_permission(permission) {
                    tracing::warn!(
                        user_id = %auth_user.user_id,
                        role = %auth_user.role,
                        missing = %permission,
                        "Permission denied"
                    );
                    return Err(scholaris_core::AppError::forbidden(format!(
                        "Access denied. Missing required permission: {}",
                        permission
                    )));
                }

                Ok($name(auth_user))
            }
        }
    };
}

require_permission!(RequireUserView, scholaris_core::Permission::UserView);
require_permission!(RequireUserCreate, scholaris_core::Permission::UserCreate);
require_permission!(RequireRoleView, scholaris_core::Permission::RoleView);
require_permission!(RequireRoleAssign, scholaris_core::Permission::RoleAssign);
