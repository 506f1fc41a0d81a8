//! The permission catalogue.
//!
//! Every capability in Scholaris is a [`Permission`]: a closed enum whose
//! string form is a `"<resource>:<action>"` token such as `"student:create"`.
//! Tokens are persisted and sent over the wire, so renaming one is a breaking
//! change.
//!
//! Permissions are grouped into [`PermissionCategory`] values for display.
//! Categories carry no enforcement meaning.
//!
//! Both enums are generated from the literal table at the bottom of this
//! module, so a permission cannot exist without a category.
//!
//! # Example
//!
//! ```ignore
//! use scholaris_core::permissions::{Permission, permissions_for_category};
//!
//! let p: Permission = "grading:view".parse()?;
//! assert_eq!(p.as_str(), "grading:view");
//! assert!(permissions_for_category("grading").contains(&p));
//! assert!(permissions_for_category("no_such_category").is_empty());
//! ```

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::{bail, ensure};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::access::PermissionSet;
use crate::roles::SystemRole;

macro_rules! permission_registry {
    (
        $(
            $category:ident ($slug:literal, $name:literal) {
                $( $variant:ident => $token:literal, $desc:literal; )+
            }
        )+
    ) => {
        /// A single capability token.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Permission {
            $( $( #[doc = $desc] $variant, )+ )+
        }

        /// A presentation grouping of related permissions.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum PermissionCategory {
            $( #[doc = $name] $category, )+
        }

        impl Permission {
            /// Every permission, in catalogue order.
            pub const ALL: &'static [Permission] = &[ $( $( Permission::$variant, )+ )+ ];

            /// The `resource:action` token.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( $( Permission::$variant => $token, )+ )+
                }
            }

            pub const fn description(self) -> &'static str {
                match self {
                    $( $( Permission::$variant => $desc, )+ )+
                }
            }

            pub const fn category(self) -> PermissionCategory {
                match self {
                    $( $( Permission::$variant => PermissionCategory::$category, )+ )+
                }
            }

            fn from_token(token: &str) -> Option<Self> {
                match token {
                    $( $( $token => Some(Permission::$variant), )+ )+
                    _ => None,
                }
            }
        }

        impl PermissionCategory {
            /// Every category, in display order.
            pub const ALL: &'static [PermissionCategory] = &[ $( PermissionCategory::$category, )+ ];

            pub const fn slug(self) -> &'static str {
                match self {
                    $( PermissionCategory::$category => $slug, )+
                }
            }

            pub const fn name(self) -> &'static str {
                match self {
                    $( PermissionCategory::$category => $name, )+
                }
            }

            /// Members of this category, in display order.
            pub const fn permissions(self) -> &'static [Permission] {
                match self {
                    $( PermissionCategory::$category => &[ $( Permission::$variant, )+ ], )+
                }
            }
        }
    };
}

permission_registry! {
    StudentManagement ("student_management", "Student Management") {
        StudentView => "student:view", "View student records";
        StudentCreate => "student:create", "Enroll new students";
        StudentUpdate => "student:update", "Edit student records";
        StudentDelete => "student:delete", "Remove student records";
        StudentProfile => "student:profile", "View a student's full profile";
        StudentExport => "student:export", "Export student data";
    }
    TeacherManagement ("teacher_management", "Teacher Management") {
        TeacherView => "teacher:view", "View teacher records";
        TeacherCreate => "teacher:create", "Add teachers";
        TeacherUpdate => "teacher:update", "Edit teacher records";
        TeacherDelete => "teacher:delete", "Remove teachers";
        TeacherAssign => "teacher:assign", "Assign teachers to classes and subjects";
    }
    ClassManagement ("class_management", "Class Management") {
        ClassView => "class:view", "View classes";
        ClassCreate => "class:create", "Create classes";
        ClassUpdate => "class:update", "Edit classes";
        ClassDelete => "class:delete", "Delete classes";
        ClassEnroll => "class:enroll", "Enroll students into classes";
    }
    Attendance ("attendance", "Attendance") {
        AttendanceView => "attendance:view", "View attendance records";
        AttendanceMark => "attendance:mark", "Take attendance";
        AttendanceUpdate => "attendance:update", "Correct attendance records";
        AttendanceReport => "attendance:report", "Produce attendance reports";
    }
    Grading ("grading", "Grading") {
        GradingView => "grading:view", "View grades";
        GradingCreate => "grading:create", "Enter grades";
        GradingUpdate => "grading:update", "Edit grades";
        GradingDelete => "grading:delete", "Delete grades";
        GradingPublish => "grading:publish", "Publish grades to students and parents";
    }
    FinancialManagement ("financial_management", "Financial Management") {
        FinancialView => "financial:view", "View invoices, fees and payments";
        FinancialCreate => "financial:create", "Record invoices and payments";
        FinancialUpdate => "financial:update", "Edit financial transactions";
        FinancialDelete => "financial:delete", "Void financial transactions";
        FinancialReport => "financial:report", "Produce financial reports";
    }
    Library ("library", "Library") {
        LibraryView => "library:view", "Browse the library catalogue";
        LibraryCreate => "library:create", "Add books to the catalogue";
        LibraryUpdate => "library:update", "Edit catalogue entries";
        LibraryDelete => "library:delete", "Remove catalogue entries";
        LibraryIssue => "library:issue", "Issue books to borrowers";
        LibraryReturn => "library:return", "Check returned books back in";
    }
    Timetable ("timetable", "Timetable") {
        TimetableView => "timetable:view", "View timetables";
        TimetableCreate => "timetable:create", "Create timetable entries";
        TimetableUpdate => "timetable:update", "Edit timetable entries";
        TimetableDelete => "timetable:delete", "Delete timetable entries";
    }
    Communication ("communication", "Communication") {
        AnnouncementView => "announcement:view", "Read announcements";
        AnnouncementCreate => "announcement:create", "Post announcements";
        AnnouncementUpdate => "announcement:update", "Edit announcements";
        AnnouncementDelete => "announcement:delete", "Delete announcements";
        MessageView => "message:view", "Read messages";
        MessageSend => "message:send", "Send messages";
    }
    Reports ("reports", "Reports") {
        ReportView => "report:view", "View reports";
        ReportGenerate => "report:generate", "Generate reports";
        ReportExport => "report:export", "Export reports";
    }
    UserManagement ("user_management", "User Management") {
        UserView => "user:view", "View user accounts";
        UserCreate => "user:create", "Create user accounts";
        UserUpdate => "user:update", "Edit user accounts";
        UserDelete => "user:delete", "Delete user accounts";
    }
    RoleManagement ("role_management", "Role Management") {
        RoleView => "role:view", "View roles and the permission catalogue";
        RoleCreate => "role:create", "Create roles";
        RoleUpdate => "role:update", "Edit roles";
        RoleDelete => "role:delete", "Delete roles";
        RoleAssign => "role:assign", "Change the role of a user";
    }
    System ("system", "System Administration") {
        SystemSettings => "system:settings", "Change system settings";
        SystemAudit => "system:audit", "Read the audit trail";
        SystemBackup => "system:backup", "Run and restore backups";
    }
}

static ALL_PERMISSIONS: LazyLock<PermissionSet> =
    LazyLock::new(|| Permission::ALL.iter().copied().collect());

/// The whole registry as a set. Seeds the super admin template.
pub fn all_permissions() -> &'static PermissionSet {
    &ALL_PERMISSIONS
}

/// Members of the category named by `key` (slug or display name).
///
/// An unknown category yields an empty slice, not an error.
pub fn permissions_for_category(key: &str) -> &'static [Permission] {
    PermissionCategory::from_key(key)
        .map(PermissionCategory::permissions)
        .unwrap_or(&[])
}

impl PermissionCategory {
    /// Looks a category up by slug (`student_management`) or display name
    /// (`Student Management`).
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.slug() == key || c.name() == key)
    }
}

/// Integrity check run once at startup.
///
/// Fails if a token is duplicated or malformed, if a permission is missing
/// from every category, if a permission appears in two categories, or if the
/// super admin template drifted from the registry.
pub fn verify_registry() -> anyhow::Result<()> {
    let mut tokens = HashSet::with_capacity(Permission::ALL.len());
    for permission in Permission::ALL {
        let token = permission.as_str();
        ensure!(tokens.insert(token), "duplicate permission token: {token}");
        ensure!(
            is_well_formed(token),
            "malformed permission token: {token:?} (expected resource:action)"
        );
        ensure!(
            PermissionCategory::ALL
                .iter()
                .any(|c| c.permissions().contains(permission)),
            "permission {token} belongs to no category"
        );
    }

    let categorized: usize = PermissionCategory::ALL
        .iter()
        .map(|c| c.permissions().len())
        .sum();
    if categorized != Permission::ALL.len() {
        bail!(
            "category listing holds {categorized} entries but the registry has {} permissions",
            Permission::ALL.len()
        );
    }

    let mut keys = HashSet::new();
    for category in PermissionCategory::ALL {
        ensure!(
            keys.insert(category.slug()) && keys.insert(category.name()),
            "duplicate category key: {}",
            category.slug()
        );
    }

    ensure!(
        SystemRole::SuperAdmin.permissions() == all_permissions(),
        "super admin template does not match the permission registry"
    );

    Ok(())
}

fn is_well_formed(token: &str) -> bool {
    let valid_part =
        |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_lowercase() || c == '_');
    match token.split_once(':') {
        Some((resource, action)) => valid_part(resource) && valid_part(action),
        None => false,
    }
}

/// Error for a token outside the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPermission(pub String);

impl fmt::Display for UnknownPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown permission: {}", self.0)
    }
}

impl std::error::Error for UnknownPermission {}

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::from_token(s).ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        token.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for PermissionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
