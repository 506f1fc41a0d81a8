//! Plain-text rendering of the catalogue, the role templates and access checks.

use std::fmt::Write;

use scholaris_core::{
    AccessMode, PermissionCategory, RoleTemplate, SystemRole, TokenCheck, check_tokens,
    role_templates,
};

/// Every category with its members, followed by the registry total.
pub fn render_catalog() -> String {
    let mut out = String::new();
    for category in PermissionCategory::ALL {
        write_category(&mut out, *category);
        out.push('\n');
    }
    let _ = writeln!(
        out,
        "{} permissions in {} categories",
        scholaris_core::all_permissions().len(),
        PermissionCategory::ALL.len()
    );
    out
}

/// One category by slug or display name. Unknown keys render nothing.
pub fn render_category(key: &str) -> String {
    let mut out = String::new();
    if let Some(category) = PermissionCategory::from_key(key) {
        write_category(&mut out, category);
    }
    out
}

fn write_category(out: &mut String, category: PermissionCategory) {
    let _ = writeln!(out, "{} ({})", category.name(), category.slug());
    for permission in category.permissions() {
        let _ = writeln!(
            out,
            "  {:<22} {}",
            permission.as_str(),
            permission.description()
        );
    }
}

/// All templates, or just `role`.
pub fn render_roles(role: Option<SystemRole>) -> String {
    let mut out = String::new();
    match role {
        Some(role) => write_template(&mut out, role.template()),
        None => {
            for template in role_templates() {
                write_template(&mut out, template);
                out.push('\n');
            }
        }
    }
    out
}

fn write_template(out: &mut String, template: &RoleTemplate) {
    let _ = writeln!(
        out,
        "{} [{}] - {} permissions",
        template.name,
        template.role,
        template.permissions.len()
    );
    let _ = writeln!(out, "  {}", template.description);
    for permission in &template.permissions {
        let _ = writeln!(out, "  - {}", permission);
    }
}

/// Evaluates `tokens` for `role` exactly as the API gate would.
pub fn check_role(role: SystemRole, tokens: &[String], mode: AccessMode) -> TokenCheck {
    check_tokens(role.permissions(), tokens, mode)
}

pub fn render_check(outcome: &TokenCheck) -> String {
    if outcome.allowed {
        "allowed\n".to_string()
    } else if outcome.missing.is_empty() {
        "denied\n".to_string()
    } else {
        format!("denied (missing: {})\n", outcome.missing.join(", "))
    }
}
