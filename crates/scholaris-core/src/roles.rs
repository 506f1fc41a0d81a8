//! Predefined role templates.
//!
//! Every user holds exactly one [`SystemRole`], and their effective permission
//! set is that role's template. There are no per-user grants.
//!
//! Templates are built once per process and never mutated. The super admin
//! template is derived from the registry so a newly added permission reaches
//! it automatically; the others are literal lists.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::access::PermissionSet;
use crate::permissions::{Permission, PermissionCategory, all_permissions};

/// The role a user account holds. The snake_case key is persisted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SystemRole {
    SuperAdmin,
    Admin,
    Teacher,
    Student,
    Parent,
}

impl SystemRole {
    pub const ALL: [SystemRole; 5] = [
        SystemRole::SuperAdmin,
        SystemRole::Admin,
        SystemRole::Teacher,
        SystemRole::Student,
        SystemRole::Parent,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            SystemRole::SuperAdmin => "super_admin",
            SystemRole::Admin => "admin",
            SystemRole::Teacher => "teacher",
            SystemRole::Student => "student",
            SystemRole::Parent => "parent",
        }
    }

    pub fn template(self) -> &'static RoleTemplate {
        let index = match self {
            SystemRole::SuperAdmin => 0,
            SystemRole::Admin => 1,
            SystemRole::Teacher => 2,
            SystemRole::Student => 3,
            SystemRole::Parent => 4,
        };
        &TEMPLATES[index]
    }

    /// The effective permission set of anyone holding this role.
    pub fn permissions(self) -> &'static PermissionSet {
        &self.template().permissions
    }
}

/// A named bundle of permissions assigned wholesale to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTemplate {
    pub role: SystemRole,
    pub name: &'static str,
    pub description: &'static str,
    pub permissions: PermissionSet,
}

/// All five templates, in [`SystemRole::ALL`] order.
pub fn role_templates() -> &'static [RoleTemplate] {
    TEMPLATES.as_slice()
}

static TEMPLATES: LazyLock<[RoleTemplate; 5]> = LazyLock::new(|| {
    [
        RoleTemplate {
            role: SystemRole::SuperAdmin,
            name: "Super Admin",
            description: "Unrestricted access to every part of the system",
            permissions: all_permissions().clone(),
        },
        RoleTemplate {
            role: SystemRole::Admin,
            name: "Admin",
            description: "Runs the school: records, academics, finance and accounts",
            permissions: admin_permissions(),
        },
        RoleTemplate {
            role: SystemRole::Teacher,
            name: "Teacher",
            description: "Teaching staff: attendance, grading and class communication",
            permissions: collect(TEACHER),
        },
        RoleTemplate {
            role: SystemRole::Student,
            name: "Student",
            description: "Enrolled student: own records, grades and timetable",
            permissions: collect(STUDENT),
        },
        RoleTemplate {
            role: SystemRole::Parent,
            name: "Parent",
            description: "Guardian: child's progress, attendance and fees",
            permissions: collect(PARENT),
        },
    ]
});

fn admin_permissions() -> PermissionSet {
    use PermissionCategory::*;

    let mut set: PermissionSet = [
        StudentManagement,
        TeacherManagement,
        ClassManagement,
        Attendance,
        Grading,
        FinancialManagement,
        Library,
        Timetable,
        Communication,
        Reports,
        UserManagement,
    ]
    .into_iter()
    .flat_map(PermissionCategory::permissions)
    .copied()
    .collect();
    set.insert(Permission::RoleView);
    set.insert(Permission::RoleAssign);
    set
}

fn collect(list: &[Permission]) -> PermissionSet {
    list.iter().copied().collect()
}

const TEACHER: &[Permission] = &[
    Permission::StudentView,
    Permission::StudentProfile,
    Permission::TeacherView,
    Permission::ClassView,
    Permission::AttendanceView,
    Permission::AttendanceMark,
    Permission::AttendanceUpdate,
    Permission::AttendanceReport,
    Permission::GradingView,
    Permission::GradingCreate,
    Permission::GradingUpdate,
    Permission::GradingPublish,
    Permission::LibraryView,
    Permission::TimetableView,
    Permission::AnnouncementView,
    Permission::AnnouncementCreate,
    Permission::MessageView,
    Permission::MessageSend,
    Permission::ReportView,
];

const STUDENT: &[Permission] = &[
    Permission::StudentView,
    Permission::StudentProfile,
    Permission::ClassView,
    Permission::AttendanceView,
    Permission::GradingView,
    Permission::LibraryView,
    Permission::TimetableView,
    Permission::AnnouncementView,
    Permission::MessageView,
    Permission::MessageSend,
];

const PARENT: &[Permission] = &[
    Permission::StudentView,
    Permission::StudentProfile,
    Permission::AttendanceView,
    Permission::GradingView,
    Permission::FinancialView,
    Permission::TimetableView,
    Permission::AnnouncementView,
    Permission::MessageView,
    Permission::MessageSend,
    Permission::ReportView,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for SystemRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SystemRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl TryFrom<String> for SystemRole {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for SystemRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
