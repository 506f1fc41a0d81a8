use anyhow::anyhow;
use scholaris_core::{AppError, SystemRole, role_templates};
use scholaris_models::RoleTemplateResponse;

pub struct RoleService;

impl RoleService {
    pub fn list_roles() -> Vec<RoleTemplateResponse> {
        role_templates()
            .iter()
            .map(RoleTemplateResponse::from)
            .collect()
    }

    pub fn get_role(key: &str) -> Result<RoleTemplateResponse, AppError> {
        let role: SystemRole = key
            .parse()
            .map_err(|_| AppError::not_found(anyhow!("Role '{}' not found", key)))?;
        Ok(RoleTemplateResponse::from(role.template()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_roles_in_order() {
        let roles: Vec<SystemRole> = RoleService::list_roles().iter().map(|r| r.role).collect();
        assert_eq!(roles, SystemRole::ALL.to_vec());
    }

    #[test]
    fn test_get_role() {
        let admin = RoleService::get_role("admin").unwrap();
        assert!(admin.permissions.contains(&"role:assign".to_string()));
        assert!(!admin.permissions.contains(&"role:create".to_string()));
        assert!(!admin.permissions.contains(&"system:settings".to_string()));
    }

    #[test]
    fn test_get_unknown_role_is_404() {
        let err = RoleService::get_role("principal").unwrap_err();
        assert_eq!(err.status.as_u16(), 404);
    }
}
