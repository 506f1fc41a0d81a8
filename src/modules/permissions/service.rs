use scholaris_core::{PermissionCategory, all_permissions, permissions_for_category};
use scholaris_models::{
    CategoryPermissionsResponse, PermissionCatalogResponse, PermissionCategoryResponse,
    PermissionInfo,
};

pub struct PermissionService;

impl PermissionService {
    pub fn catalog() -> PermissionCatalogResponse {
        PermissionCatalogResponse {
            categories: PermissionCategory::ALL
                .iter()
                .copied()
                .map(PermissionCategoryResponse::from)
                .collect(),
            total: all_permissions().len(),
        }
    }

    /// Members of the category named by slug or display name. Unknown keys
    /// produce an empty list.
    pub fn category(key: &str) -> CategoryPermissionsResponse {
        CategoryPermissionsResponse {
            category: key.to_string(),
            permissions: permissions_for_category(key)
                .iter()
                .copied()
                .map(PermissionInfo::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_total_matches_category_sizes() {
        let catalog = PermissionService::catalog();
        let sum: usize = catalog.categories.iter().map(|c| c.permissions.len()).sum();
        assert_eq!(catalog.total, sum);
        assert_eq!(catalog.categories.len(), PermissionCategory::ALL.len());
    }

    #[test]
    fn test_category_lookup() {
        let response = PermissionService::category("attendance");
        let tokens: Vec<&str> = response
            .permissions
            .iter()
            .map(|p| p.token.as_str())
            .collect();
        assert_eq!(
            tokens,
            vec![
                "attendance:view",
                "attendance:mark",
                "attendance:update",
                "attendance:report",
            ]
        );
    }

    #[test]
    fn test_unknown_category_is_empty() {
        let response = PermissionService::category("transport");
        assert_eq!(response.category, "transport");
        assert!(response.permissions.is_empty());
    }
}
