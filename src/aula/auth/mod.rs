//! Authentication core.
//!
//! Flow overview:
//! - `login` checks email/password against the [`CredentialStore`], then
//!   branches on [`Role`]. Administrators get a session token at once.
//! - Staff sessions are scoped to one course. Zero assignments is a denial,
//!   one assignment is bound directly, several return a pending selection.
//! - `select_course` re-checks the chosen (identity, course) pair against the
//!   store before a token is minted. A stale candidate list is harmless.
//! - `check_user` and `manual_login` issue short-lived generic tokens with no
//!   branching.
//!
//! Nothing here writes to the store or keeps per-request state between calls.

mod credentials;
mod error;
mod flow;
mod identity;
mod postgres;
mod selection;
mod state;
mod store;
mod token;

pub use credentials::Credentials;
pub use error::AuthError;
pub use flow::{LoginOutcome, PendingSelection, PendingUser, Session};
pub use identity::{CourseAssignment, Identity, Role, ADMIN_ROLE_ID};
pub use postgres::PgCredentialStore;
pub use selection::CourseScope;
pub use state::{AuthConfig, AuthState, DEVELOPMENT_JWT_SECRET};
pub use store::{CredentialStore, StoreError};
pub use token::{
    AdminUser, FacultyUser, ProbeClaims, SessionClaims, TokenIssuer, SELECTION_AUDIENCE,
};

#[cfg(test)]
pub(crate) mod test_support;
