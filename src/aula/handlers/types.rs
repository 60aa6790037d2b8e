//! Request/response types for the auth endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::aula::auth::{
    AdminUser, CourseAssignment, FacultyUser, PendingSelection, PendingUser, ProbeClaims, Session,
};

#[derive(ToSchema, Deserialize, Debug, Default)]
pub struct CheckUserRequest {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(ToSchema, Deserialize, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "password")]
    pub secret: Option<String>,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("secret", &self.secret.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(ToSchema, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SelectCourseRequest {
    #[serde(default, alias = "userId")]
    pub identity_id: Option<i32>,
    #[serde(default, alias = "courseId")]
    pub chosen_course_id: Option<i32>,
    #[serde(default)]
    pub selection_ticket: Option<String>,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct AdminSessionResponse {
    pub token: String,
    pub user: AdminUser,
}

impl From<Session<AdminUser>> for AdminSessionResponse {
    fn from(session: Session<AdminUser>) -> Self {
        Self {
            token: session.token,
            user: session.user,
        }
    }
}

/// Staff session bound to one course.
#[derive(ToSchema, Serialize, Debug)]
pub struct FacultySessionResponse {
    pub token: String,
    pub user: FacultyUser,
}

impl From<Session<FacultyUser>> for FacultySessionResponse {
    fn from(session: Session<FacultyUser>) -> Self {
        Self {
            token: session.token,
            user: session.user,
        }
    }
}

#[derive(ToSchema, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRequiredResponse {
    pub requires_selection: bool,
    pub user: PendingUser,
    pub courses: Vec<CourseAssignment>,
    pub selection_ticket: String,
}

impl From<PendingSelection> for SelectionRequiredResponse {
    fn from(pending: PendingSelection) -> Self {
        Self {
            requires_selection: true,
            user: pending.user,
            courses: pending.courses,
            selection_ticket: pending.selection_ticket,
        }
    }
}

/// Body of a successful primary login, one shape per branch.
#[derive(ToSchema, Serialize, Debug)]
#[serde(untagged)]
pub enum LoginResponse {
    Administrator(AdminSessionResponse),
    Faculty(FacultySessionResponse),
    SelectionRequired(SelectionRequiredResponse),
}

#[derive(ToSchema, Serialize, Debug)]
pub struct ProbeUser {
    pub email: String,
    pub role: Option<String>,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct ProbeResponse {
    pub success: bool,
    pub user: ProbeUser,
    pub token: String,
}

impl From<Session<ProbeClaims>> for ProbeResponse {
    fn from(session: Session<ProbeClaims>) -> Self {
        Self {
            success: true,
            user: ProbeUser {
                email: session.user.email,
                role: session.user.role,
            },
            token: session.token,
        }
    }
}

#[derive(ToSchema, Serialize, Debug)]
pub struct ProbeFailure {
    pub success: bool,
    pub message: String,
}

impl ProbeFailure {
    #[must_use]
    pub const fn new(message: String) -> Self {
        Self {
            success: false,
            message,
        }
    }
}
