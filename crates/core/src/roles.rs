//! Role names and the capability table.
//!
//! The role strings must match the CHECK constraint on `users.role`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::User => ROLE_USER,
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_USER => Ok(Role::User),
            other => Err(CoreError::validation(
                "role",
                format!("unknown role '{other}'"),
            )),
        }
    }

    pub fn can(self, capability: Capability) -> bool {
        match capability {
            Capability::ViewDashboard
            | Capability::ManageTransactions
            | Capability::RecordAttendance
            | Capability::ViewCatalog => true,
            Capability::ManageUsers
            | Capability::ViewTransactionReport
            | Capability::ViewAttendanceReport => self == Role::Admin,
        }
    }
}

/// Actions gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ViewDashboard,
    ManageTransactions,
    RecordAttendance,
    ViewCatalog,
    ManageUsers,
    ViewTransactionReport,
    ViewAttendanceReport,
}

/// Resolve a stored role name and check it grants `capability`.
///
/// Unknown role names are treated as having no capabilities.
pub fn authorize(role: &str, capability: Capability) -> Result<Role, CoreError> {
    let resolved = Role::parse(role)
        .map_err(|_| CoreError::Forbidden(format!("Unknown role '{role}'")))?;
    if resolved.can(capability) {
        Ok(resolved)
    } else {
        Err(CoreError::Forbidden(format!(
            "Role '{role}' may not perform {capability:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn staff_capabilities() {
        for cap in [
            Capability::ViewDashboard,
            Capability::ManageTransactions,
            Capability::RecordAttendance,
            Capability::ViewCatalog,
        ] {
            assert!(Role::User.can(cap));
            assert!(Role::Admin.can(cap));
        }
    }

    #[test]
    fn admin_only_capabilities() {
        for cap in [
            Capability::ManageUsers,
            Capability::ViewTransactionReport,
            Capability::ViewAttendanceReport,
        ] {
            assert!(!Role::User.can(cap));
            assert!(Role::Admin.can(cap));
        }
    }

    #[test]
    fn authorize_rejects_unknown_and_insufficient_roles() {
        assert_eq!(authorize("admin", Capability::ManageUsers).unwrap(), Role::Admin);
        assert_matches!(
            authorize("user", Capability::ManageUsers),
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            authorize("owner", Capability::ViewCatalog),
            Err(CoreError::Forbidden(_))
        );
    }
}
