//! Read models for the permission catalogue and the role templates.
//!
//! Permissions and roles are fixed in code, so nothing here is a database
//! row. Tokens are rendered as their `resource:action` strings.

use scholaris_core::{AccessMode, Permission, PermissionCategory, RoleTemplate, SystemRole};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PermissionInfo {
    #[schema(example = "student:view")]
    pub token: String,
    pub description: String,
    /// Slug of the owning category
    #[schema(example = "student_management")]
    pub category: String,
}

impl From<Permission> for PermissionInfo {
    fn from(permission: Permission) -> Self {
        Self {
            token: permission.as_str().to_string(),
            description: permission.description().to_string(),
            category: permission.category().slug().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PermissionCategoryResponse {
    pub slug: String,
    pub name: String,
    pub permissions: Vec<PermissionInfo>,
}

impl From<PermissionCategory> for PermissionCategoryResponse {
    fn from(category: PermissionCategory) -> Self {
        Self {
            slug: category.slug().to_string(),
            name: category.name().to_string(),
            permissions: category
                .permissions()
                .iter()
                .copied()
                .map(PermissionInfo::from)
                .collect(),
        }
    }
}

/// The whole catalogue grouped by category.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PermissionCatalogResponse {
    pub categories: Vec<PermissionCategoryResponse>,
    /// Number of distinct permissions in the registry
    pub total: usize,
}

/// Members of a single category lookup. An unknown key yields an empty list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryPermissionsResponse {
    pub category: String,
    pub permissions: Vec<PermissionInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoleTemplateResponse {
    pub role: SystemRole,
    pub name: String,
    pub description: String,
    /// Granted tokens, sorted
    pub permissions: Vec<String>,
}

impl From<&RoleTemplate> for RoleTemplateResponse {
    fn from(template: &RoleTemplate) -> Self {
        Self {
            role: template.role,
            name: template.name.to_string(),
            description: template.description.to_string(),
            permissions: template
                .permissions
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
        }
    }
}

/// Ask whether the caller holds a set of permissions.
///
/// Unknown tokens are accepted and count as not granted.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AuthorizationCheckRequest {
    #[schema(example = json!(["grading:view", "grading:publish"]))]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub mode: AccessMode,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorizationCheckResponse {
    pub allowed: bool,
    pub mode: AccessMode,
    /// Requested tokens the caller does not hold
    pub missing: Vec<String>,
}
