//! Records read from the credential store: identities, their role and the
//! course assignments that scope staff sessions.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role id reserved for administrators in the `role` table.
pub const ADMIN_ROLE_ID: i32 = 1;

/// A person allowed to authenticate. The stored secret never leaves the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub id: i32,
    pub email: String,
    pub display_name: String,
    pub staff_identifier: Option<String>,
    pub photo_ref: Option<String>,
    pub role_id: i32,
    /// Name of the joined `role` row, `None` when the row is missing.
    pub role_name: Option<String>,
}

impl Identity {
    #[must_use]
    pub const fn role(&self) -> Role {
        Role::from_role_id(self.role_id)
    }
}

/// Coarse permission class used to branch the login flow.
///
/// Callers match on it exhaustively; a new role must be handled explicitly
/// instead of falling through to the staff branch.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[serde(rename = "admin")]
    Administrator,
    #[serde(rename = "faculty")]
    Staff,
}

impl Role {
    /// Classify a stored role id. Only the administrator sentinel is special.
    #[must_use]
    pub const fn from_role_id(role_id: i32) -> Self {
        if role_id == ADMIN_ROLE_ID {
            Self::Administrator
        } else {
            Self::Staff
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Administrator => "admin",
            Self::Staff => "faculty",
        }
    }
}

/// One row of the staff/course relation, resolved to course and department.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseAssignment {
    pub course_id: i32,
    pub course_code: String,
    pub subject_name: String,
    pub department_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_from_sentinel_is_administrator() {
        assert_eq!(Role::from_role_id(ADMIN_ROLE_ID), Role::Administrator);
    }

    #[test]
    fn any_other_role_id_is_staff() {
        for role_id in [0, 2, 3, 42, -1] {
            assert_eq!(Role::from_role_id(role_id), Role::Staff);
        }
    }

    #[test]
    fn role_serializes_to_wire_names() -> serde_json::Result<()> {
        assert_eq!(serde_json::to_value(Role::Administrator)?, "admin");
        assert_eq!(serde_json::to_value(Role::Staff)?, "faculty");
        assert_eq!(Role::Staff.as_str(), "faculty");
        Ok(())
    }

    #[test]
    fn course_assignment_uses_camel_case() -> serde_json::Result<()> {
        let assignment = CourseAssignment {
            course_id: 5,
            course_code: "CS101".to_string(),
            subject_name: "Programming".to_string(),
            department_name: "Computer Science".to_string(),
        };
        let value = serde_json::to_value(&assignment)?;
        assert_eq!(value["courseId"], 5);
        assert_eq!(value["courseCode"], "CS101");
        assert_eq!(value["subjectName"], "Programming");
        assert_eq!(value["departmentName"], "Computer Science");
        Ok(())
    }
}
