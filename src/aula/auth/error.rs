use axum::http::StatusCode;
use thiserror::Error;

use super::store::StoreError;

/// Failures of the authentication flow. Every variant is terminal for the
/// current request and no token is issued alongside any of them.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email and password are required")]
    MissingCredentials,
    #[error("{0}")]
    MissingFields(&'static str),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User not found")]
    UnknownIdentity,
    #[error("You are not assigned to any courses. Please contact an admin.")]
    NoCourseAssignment,
    #[error("User is not assigned to the selected course.")]
    UnauthorizedCourseSelection,
    // Display stays generic; the source is only logged.
    #[error("Server error")]
    StoreUnavailable(#[source] StoreError),
    #[error("Server error")]
    TokenIssue(#[source] jsonwebtoken::errors::Error),
}

impl AuthError {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingCredentials | Self::MissingFields(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::UnknownIdentity => StatusCode::NOT_FOUND,
            Self::NoCourseAssignment | Self::UnauthorizedCourseSelection => StatusCode::FORBIDDEN,
            Self::StoreUnavailable(_) | Self::TokenIssue(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Server-side faults, as opposed to rejections caused by the caller.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_) | Self::TokenIssue(_))
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        Self::StoreUnavailable(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            AuthError::MissingCredentials.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::MissingFields("Email is required").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::UnknownIdentity.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AuthError::NoCourseAssignment.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::UnauthorizedCourseSelection.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::from(StoreError::Unavailable("down".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_faults_do_not_leak_details() {
        let err = AuthError::from(StoreError::Unavailable("connection refused".to_string()));
        assert_eq!(err.to_string(), "Server error");
        assert!(err.is_internal());
        assert!(!AuthError::InvalidCredentials.is_internal());
    }
}
