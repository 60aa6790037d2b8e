//! The four entry points of the authentication flow, independent of HTTP.

use serde::Serialize;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use super::credentials::{self, present, Credentials};
use super::error::AuthError;
use super::identity::{CourseAssignment, Identity, Role};
use super::selection::{self, CourseScope};
use super::state::AuthState;
use super::token::{AdminUser, FacultyUser, ProbeClaims};

/// A signed token together with the claims it carries.
#[derive(Clone, Debug)]
pub struct Session<U> {
    pub token: String,
    pub user: U,
}

/// Identity fields shown to a staff member who has to pick a course.
#[derive(ToSchema, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingUser {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub staff_identifier: Option<String>,
    pub photo_ref: Option<String>,
    pub role: Role,
}

impl From<&Identity> for PendingUser {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            email: identity.email.clone(),
            name: identity.display_name.clone(),
            staff_identifier: identity.staff_identifier.clone(),
            photo_ref: identity.photo_ref.clone(),
            role: identity.role(),
        }
    }
}

/// Client-held state between login and finalize. Never stored server-side.
#[derive(Clone, Debug)]
pub struct PendingSelection {
    pub user: PendingUser,
    pub courses: Vec<CourseAssignment>,
    pub selection_ticket: String,
}

#[derive(Clone, Debug)]
pub enum LoginOutcome {
    Administrator(Session<AdminUser>),
    Faculty(Session<FacultyUser>),
    SelectionRequired(PendingSelection),
}

impl AuthState {
    /// Look an identity up by email alone and issue a short-lived generic token.
    /// The password is assumed to have been verified elsewhere.
    ///
    /// # Errors
    /// `MissingFields`, `UnknownIdentity`, `StoreUnavailable` or `TokenIssue`.
    #[instrument(skip(self))]
    pub async fn check_user(&self, email: Option<&str>) -> Result<Session<ProbeClaims>, AuthError> {
        let email = present(email).ok_or(AuthError::MissingFields("Email is required"))?;

        let Some(identity) = self.store().find_by_email(email).await? else {
            debug!("no identity for email");
            return Err(AuthError::UnknownIdentity);
        };

        let (token, user) = self.tokens().issue_probe(&identity)?;
        Ok(Session { token, user })
    }

    /// Verify email and password and issue a short-lived generic token, with no
    /// role or course branching.
    ///
    /// # Errors
    /// `MissingCredentials`, `InvalidCredentials`, `StoreUnavailable` or `TokenIssue`.
    #[instrument(skip(self, secret))]
    pub async fn manual_login(
        &self,
        email: Option<&str>,
        secret: Option<&str>,
    ) -> Result<Session<ProbeClaims>, AuthError> {
        let credentials = Credentials::require(email, secret)?;
        let identity = credentials::verify(self.store(), credentials).await?;

        let (token, user) = self.tokens().issue_probe(&identity)?;
        Ok(Session { token, user })
    }

    /// Primary login: verify credentials, branch on role and, for staff,
    /// scope the session to a course or ask the caller to choose one.
    ///
    /// # Errors
    /// `MissingCredentials`, `InvalidCredentials`, `NoCourseAssignment`,
    /// `StoreUnavailable` or `TokenIssue`.
    #[instrument(skip(self, secret))]
    pub async fn login(
        &self,
        email: Option<&str>,
        secret: Option<&str>,
    ) -> Result<LoginOutcome, AuthError> {
        let credentials = Credentials::require(email, secret)?;
        let identity = credentials::verify(self.store(), credentials).await?;

        match identity.role() {
            Role::Administrator => {
                debug!(identity_id = identity.id, "administrator login");
                let (token, user) = self.tokens().issue_admin(&identity)?;
                Ok(LoginOutcome::Administrator(Session { token, user }))
            }
            Role::Staff => {
                let assignments = selection::enumerate(self.store(), identity.id).await?;
                match selection::decide(assignments)? {
                    CourseScope::Single(course) => {
                        debug!(identity_id = identity.id, course_id = course.course_id, "single course login");
                        let (token, user) = self.tokens().issue_faculty(&identity, &course)?;
                        Ok(LoginOutcome::Faculty(Session { token, user }))
                    }
                    CourseScope::Ambiguous(courses) => {
                        debug!(identity_id = identity.id, candidates = courses.len(), "course selection required");
                        let selection_ticket = self.tokens().issue_selection_ticket(identity.id)?;
                        Ok(LoginOutcome::SelectionRequired(PendingSelection {
                            user: PendingUser::from(&identity),
                            courses,
                            selection_ticket,
                        }))
                    }
                }
            }
        }
    }

    /// Finish a login that required a course choice.
    ///
    /// # Errors
    /// `MissingFields`, `UnknownIdentity`, `UnauthorizedCourseSelection`,
    /// `StoreUnavailable` or `TokenIssue`.
    #[instrument(skip(self, selection_ticket))]
    pub async fn select_course(
        &self,
        identity_id: Option<i32>,
        course_id: Option<i32>,
        selection_ticket: Option<&str>,
    ) -> Result<Session<FacultyUser>, AuthError> {
        let (Some(identity_id), Some(course_id)) = (
            identity_id.filter(|id| *id > 0),
            course_id.filter(|id| *id > 0),
        ) else {
            return Err(AuthError::MissingFields(
                "User ID and Course ID are required.",
            ));
        };

        match present(selection_ticket) {
            Some(ticket) => self.tokens().verify_selection_ticket(ticket, identity_id)?,
            None if self.config().require_selection_ticket() => {
                return Err(AuthError::MissingFields("Selection ticket is required."));
            }
            None => {}
        }

        let (identity, course) = selection::finalize(self.store(), identity_id, course_id).await?;

        let (token, user) = self.tokens().issue_faculty(&identity, &course)?;
        Ok(Session { token, user })
    }
}
