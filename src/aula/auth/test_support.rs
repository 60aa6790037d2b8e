//! In-memory credential store for tests.

use async_trait::async_trait;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex, PoisonError,
};

use super::identity::{CourseAssignment, Identity};
use super::store::{CredentialStore, StoreError};

#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    identities: Vec<(Identity, String)>,
    assignments: Mutex<Vec<(i32, CourseAssignment)>>,
    failing: bool,
    calls: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_identity(mut self, identity: Identity, secret: &str) -> Self {
        self.identities.push((identity, secret.to_string()));
        self
    }

    pub(crate) fn with_assignment(self, identity_id: i32, assignment: CourseAssignment) -> Self {
        self.assignments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((identity_id, assignment));
        self
    }

    /// Every lookup fails as if the database were unreachable.
    pub(crate) fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Shared counter of store lookups, still readable once the store is boxed.
    pub(crate) fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    pub(crate) fn revoke(&self, identity_id: i32, course_id: i32) {
        self.assignments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(owner, assignment)| {
                !(*owner == identity_id && assignment.course_id == course_id)
            });
    }

    fn enter(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(StoreError::Unavailable("simulated outage".to_string()));
        }
        Ok(())
    }

    fn find(&self, predicate: impl Fn(&Identity, &str) -> bool) -> Option<Identity> {
        self.identities
            .iter()
            .find(|(identity, secret)| predicate(identity, secret))
            .map(|(identity, _)| identity.clone())
    }

    fn assignments_of(&self, identity_id: i32) -> Vec<CourseAssignment> {
        let mut found: Vec<CourseAssignment> = self
            .assignments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(owner, _)| *owner == identity_id)
            .map(|(_, assignment)| assignment.clone())
            .collect();
        found.sort_by_key(|assignment| assignment.course_id);
        found
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_credentials(
        &self,
        email: &str,
        secret: &str,
    ) -> Result<Option<Identity>, StoreError> {
        self.enter()?;
        Ok(self.find(|identity, stored| identity.email == email && stored == secret))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        self.enter()?;
        Ok(self.find(|identity, _| identity.email == email))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Identity>, StoreError> {
        self.enter()?;
        Ok(self.find(|identity, _| identity.id == id))
    }

    async fn course_assignments(
        &self,
        identity_id: i32,
    ) -> Result<Vec<CourseAssignment>, StoreError> {
        self.enter()?;
        Ok(self.assignments_of(identity_id))
    }

    async fn find_assignment(
        &self,
        identity_id: i32,
        course_id: i32,
    ) -> Result<Option<CourseAssignment>, StoreError> {
        self.enter()?;
        Ok(self
            .assignments_of(identity_id)
            .into_iter()
            .find(|assignment| assignment.course_id == course_id))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        if self.failing {
            return Err(StoreError::Unavailable("simulated outage".to_string()));
        }
        Ok(())
    }
}

pub(crate) fn identity(id: i32, email: &str, role_id: i32) -> Identity {
    Identity {
        id,
        email: email.to_string(),
        display_name: format!("User {id}"),
        staff_identifier: Some(format!("FAC-{id:03}")),
        photo_ref: Some(format!("photos/{id}.jpg")),
        role_id,
        role_name: Some(if role_id == 1 { "admin" } else { "faculty" }.to_string()),
    }
}

pub(crate) fn course(id: i32, code: &str) -> CourseAssignment {
    CourseAssignment {
        course_id: id,
        course_code: code.to_string(),
        subject_name: format!("Subject {code}"),
        department_name: "Computer Science".to_string(),
    }
}
