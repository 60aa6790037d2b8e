//! Course scoping for staff: enumerate assignments, decide whether the caller
//! has to pick one, and re-validate the pick on finalization.

use tracing::debug;

use super::error::AuthError;
use super::identity::{CourseAssignment, Identity};
use super::store::CredentialStore;

/// What the assignment count means for the login.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CourseScope {
    /// Exactly one course: issue the scoped token straight away.
    Single(CourseAssignment),
    /// Several courses: the caller must choose before any token exists.
    Ambiguous(Vec<CourseAssignment>),
}

/// Load every course assignment of a staff identity.
///
/// # Errors
/// [`AuthError::StoreUnavailable`] when the lookup fails.
pub async fn enumerate(
    store: &dyn CredentialStore,
    identity_id: i32,
) -> Result<Vec<CourseAssignment>, AuthError> {
    Ok(store.course_assignments(identity_id).await?)
}

/// Turn the assignment list into a scope.
///
/// # Errors
/// [`AuthError::NoCourseAssignment`] for an empty list.
pub fn decide(assignments: Vec<CourseAssignment>) -> Result<CourseScope, AuthError> {
    if assignments.len() > 1 {
        return Ok(CourseScope::Ambiguous(assignments));
    }
    assignments
        .into_iter()
        .next()
        .map(CourseScope::Single)
        .ok_or(AuthError::NoCourseAssignment)
}

/// Check a caller-chosen course against the authoritative assignment table.
///
/// Both ids come straight from the request, so the pair is looked up again
/// even when the candidate list was just handed out.
///
/// # Errors
/// [`AuthError::UnknownIdentity`] when the identity is gone,
/// [`AuthError::UnauthorizedCourseSelection`] when the pair is not assigned,
/// [`AuthError::StoreUnavailable`] when a lookup fails.
pub async fn finalize(
    store: &dyn CredentialStore,
    identity_id: i32,
    course_id: i32,
) -> Result<(Identity, CourseAssignment), AuthError> {
    let identity = store
        .find_by_id(identity_id)
        .await?
        .ok_or(AuthError::UnknownIdentity)?;

    let Some(assignment) = store.find_assignment(identity_id, course_id).await? else {
        debug!(identity_id, course_id, "course selection outside assignment set");
        return Err(AuthError::UnauthorizedCourseSelection);
    };

    Ok((identity, assignment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aula::auth::test_support::{MemoryStore, course, identity};

    #[test]
    fn decide_empty_is_denied() {
        assert!(matches!(decide(Vec::new()), Err(AuthError::NoCourseAssignment)));
    }

    #[test]
    fn decide_single_binds_course() -> Result<(), AuthError> {
        let scope = decide(vec![course(5, "CS101")])?;
        assert_eq!(scope, CourseScope::Single(course(5, "CS101")));
        Ok(())
    }

    #[test]
    fn decide_many_keeps_every_candidate_in_order() -> Result<(), AuthError> {
        let candidates = vec![course(5, "CS101"), course(6, "CS102"), course(9, "CS201")];
        let scope = decide(candidates.clone())?;
        assert_eq!(scope, CourseScope::Ambiguous(candidates));
        Ok(())
    }

    #[tokio::test]
    async fn enumerate_is_stable_for_a_snapshot() -> Result<(), AuthError> {
        let store = MemoryStore::new()
            .with_assignment(9, course(6, "CS102"))
            .with_assignment(9, course(5, "CS101"))
            .with_assignment(10, course(7, "MA100"));
        let first = enumerate(&store, 9).await?;
        let second = enumerate(&store, 9).await?;
        assert_eq!(first, second);
        assert_eq!(
            first.iter().map(|c| c.course_id).collect::<Vec<_>>(),
            vec![5, 6]
        );
        Ok(())
    }

    #[tokio::test]
    async fn finalize_accepts_assigned_course() -> Result<(), AuthError> {
        let store = MemoryStore::new()
            .with_identity(identity(9, "c@x.edu", 2), "p3")
            .with_assignment(9, course(5, "CS101"))
            .with_assignment(9, course(6, "CS102"));
        let (who, assignment) = finalize(&store, 9, 6).await?;
        assert_eq!(who.id, 9);
        assert_eq!(assignment.course_id, 6);
        Ok(())
    }

    #[tokio::test]
    async fn finalize_rejects_course_of_another_identity() {
        let store = MemoryStore::new()
            .with_identity(identity(9, "c@x.edu", 2), "p3")
            .with_identity(identity(10, "d@x.edu", 2), "p4")
            .with_assignment(9, course(5, "CS101"))
            .with_assignment(10, course(7, "MA100"));
        let result = finalize(&store, 9, 7).await;
        assert!(matches!(
            result,
            Err(AuthError::UnauthorizedCourseSelection)
        ));
    }

    #[tokio::test]
    async fn finalize_unknown_identity() {
        let store = MemoryStore::new().with_assignment(9, course(5, "CS101"));
        let result = finalize(&store, 9, 5).await;
        assert!(matches!(result, Err(AuthError::UnknownIdentity)));
    }

    #[tokio::test]
    async fn finalize_sees_revocation_after_listing() -> Result<(), AuthError> {
        let store = MemoryStore::new()
            .with_identity(identity(9, "c@x.edu", 2), "p3")
            .with_assignment(9, course(5, "CS101"))
            .with_assignment(9, course(6, "CS102"));
        let listed = enumerate(&store, 9).await?;
        assert_eq!(listed.len(), 2);

        store.revoke(9, 6);

        let result = finalize(&store, 9, 6).await;
        assert!(matches!(
            result,
            Err(AuthError::UnauthorizedCourseSelection)
        ));
        Ok(())
    }
}
