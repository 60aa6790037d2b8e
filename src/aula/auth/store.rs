//! Read-only gateway to the institution's credential store.

use async_trait::async_trait;
use thiserror::Error;

use super::identity::{CourseAssignment, Identity};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Lookups the authentication flow needs. Implementations never write.
///
/// Absence is `Ok(None)` (or an empty list); `Err` is reserved for faults of
/// the store itself so the two are never conflated.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Exact match on email and secret.
    async fn find_by_credentials(
        &self,
        email: &str,
        secret: &str,
    ) -> Result<Option<Identity>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Identity>, StoreError>;

    /// All course assignments of a staff identity, in a stable order.
    async fn course_assignments(
        &self,
        identity_id: i32,
    ) -> Result<Vec<CourseAssignment>, StoreError>;

    /// The assignment row for this exact (identity, course) pair, if any.
    async fn find_assignment(
        &self,
        identity_id: i32,
        course_id: i32,
    ) -> Result<Option<CourseAssignment>, StoreError>;

    /// Cheap liveness probe used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
