use anyhow::Context;
use scholaris_auth::create_access_token;
use scholaris_config::JwtConfig;
use scholaris_core::{AppError, SystemRole, check_tokens, verify_password};
use scholaris_models::{
    AuthorizationCheckRequest, AuthorizationCheckResponse, LoginRequest, LoginResponse,
    ProfileResponse, User, UserWithPassword,
};
use sqlx::PgPool;
use tracing::instrument;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let row = sqlx::query_as::<_, UserWithPassword>(
            r#"
            SELECT id, first_name, last_name, email, role, created_at, updated_at, password
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(dto.email.trim().to_lowercase())
        .fetch_optional(db)
        .await
        .context("Failed to fetch user by email")?;

        let Some(UserWithPassword { user, password }) = row else {
            tracing::warn!("Login attempt for unknown email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&dto.password, &password)? {
            tracing::warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let access_token = create_access_token(user.id, &user.email, user.role, jwt_config)?;
        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_config.access_token_expiry,
            user,
        })
    }

    pub fn profile(user: User) -> ProfileResponse {
        let role = user.role;
        ProfileResponse {
            user,
            role,
            permissions: role
                .permissions()
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
        }
    }

    /// Evaluates raw tokens against `role`. Unknown tokens are reported as
    /// missing rather than rejected.
    pub fn check_access(
        role: SystemRole,
        request: &AuthorizationCheckRequest,
    ) -> AuthorizationCheckResponse {
        let outcome = check_tokens(role.permissions(), &request.permissions, request.mode);
        AuthorizationCheckResponse {
            allowed: outcome.allowed,
            mode: request.mode,
            missing: outcome.missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scholaris_core::AccessMode;

    fn check(role: SystemRole, tokens: &[&str], mode: AccessMode) -> AuthorizationCheckResponse {
        let request = AuthorizationCheckRequest {
            permissions: tokens.iter().map(|t| t.to_string()).collect(),
            mode,
        };
        AuthService::check_access(role, &request)
    }

    #[test]
    fn test_check_access_all() {
        let response = check(
            SystemRole::Student,
            &["student:view", "student:profile"],
            AccessMode::All,
        );
        assert!(response.allowed);
        assert!(response.missing.is_empty());
    }

    #[test]
    fn test_check_access_any_with_missing() {
        let response = check(
            SystemRole::Parent,
            &["grading:view", "system:settings"],
            AccessMode::Any,
        );
        assert!(response.allowed);
        assert_eq!(response.missing, vec!["system:settings".to_string()]);
    }

    #[test]
    fn test_check_access_empty_lists() {
        assert!(!check(SystemRole::SuperAdmin, &[], AccessMode::Any).allowed);
        assert!(check(SystemRole::Student, &[], AccessMode::All).allowed);
    }

    #[test]
    fn test_check_access_unknown_token() {
        let response = check(SystemRole::SuperAdmin, &["vault:open"], AccessMode::All);
        assert!(!response.allowed);
        assert_eq!(response.missing, vec!["vault:open".to_string()]);
    }

    #[test]
    fn test_profile_lists_role_permissions() {
        let now = chrono::Utc::now();
        let user = User {
            id: uuid::Uuid::new_v4(),
            first_name: "Tola".to_string(),
            last_name: "Ade".to_string(),
            email: "tola@school.test".to_string(),
            role: SystemRole::Teacher,
            created_at: now,
            updated_at: now,
        };
        let profile = AuthService::profile(user);
        assert_eq!(profile.role, SystemRole::Teacher);
        assert!(profile.permissions.contains(&"attendance:mark".to_string()));
        assert!(!profile.permissions.contains(&"financial:view".to_string()));
    }
}
