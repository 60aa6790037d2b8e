//! `PostgreSQL` implementation of [`CredentialStore`].
//!
//! The tables belong to the institution's records system and are only read:
//!
//! - `users(id, email, password, name, faculty_id, photo, role)`
//! - `role(id, role)`
//! - `course(id, course_code, subject)`
//! - `department(id, department)`
//! - `faculty_course(faculty, course, dept)`

use async_trait::async_trait;
use sqlx::{postgres::PgRow, Connection, PgPool, Row};
use tracing::{info_span, instrument, Instrument};

use super::identity::{CourseAssignment, Identity};
use super::store::{CredentialStore, StoreError};

const IDENTITY_SELECT: &str = r"
    SELECT u.id, u.email, COALESCE(u.name, '') AS name, u.faculty_id, u.photo, u.role,
           r.role AS role_name
    FROM users u
    LEFT JOIN role r ON u.role = r.id";

const ASSIGNMENT_SELECT: &str = r"
    SELECT c.id AS course_id, c.course_code, c.subject, d.department
    FROM faculty_course fc
    JOIN course c ON fc.course = c.id
    JOIN department d ON fc.dept = d.id";

#[derive(Clone, Debug)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_identity(
        &self,
        query: sqlx::query::Query<'_, sqlx::Postgres, sqlx::postgres::PgArguments>,
        operation: &'static str,
    ) -> Result<Option<Identity>, StoreError> {
        let span = info_span!("db.query", db.system = "postgresql", db.operation = operation);
        let row = query.fetch_optional(&self.pool).instrument(span).await?;
        row.as_ref().map(identity_from_row).transpose()
    }
}

fn identity_from_row(row: &PgRow) -> Result<Identity, StoreError> {
    Ok(Identity {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        display_name: row.try_get("name")?,
        staff_identifier: row.try_get("faculty_id")?,
        photo_ref: row.try_get("photo")?,
        role_id: row.try_get("role")?,
        role_name: row.try_get("role_name")?,
    })
}

fn assignment_from_row(row: &PgRow) -> Result<CourseAssignment, StoreError> {
    Ok(CourseAssignment {
        course_id: row.try_get("course_id")?,
        course_code: row.try_get("course_code")?,
        subject_name: row.try_get("subject")?,
        department_name: row.try_get("department")?,
    })
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    #[instrument(skip(self, secret))]
    async fn find_by_credentials(
        &self,
        email: &str,
        secret: &str,
    ) -> Result<Option<Identity>, StoreError> {
        // Plain equality on the stored secret; hashing belongs to the records system.
        let sql = format!("{IDENTITY_SELECT} WHERE u.email = $1 AND u.password = $2 LIMIT 1");
        self.fetch_identity(sqlx::query(&sql).bind(email).bind(secret), "SELECT")
            .await
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        let sql = format!("{IDENTITY_SELECT} WHERE u.email = $1 LIMIT 1");
        self.fetch_identity(sqlx::query(&sql).bind(email), "SELECT")
            .await
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> Result<Option<Identity>, StoreError> {
        let sql = format!("{IDENTITY_SELECT} WHERE u.id = $1");
        self.fetch_identity(sqlx::query(&sql).bind(id), "SELECT")
            .await
    }

    #[instrument(skip(self))]
    async fn course_assignments(
        &self,
        identity_id: i32,
    ) -> Result<Vec<CourseAssignment>, StoreError> {
        let sql = format!("{ASSIGNMENT_SELECT} WHERE fc.faculty = $1 ORDER BY c.id, d.id");
        let span = info_span!("db.query", db.system = "postgresql", db.operation = "SELECT");
        let rows = sqlx::query(&sql)
            .bind(identity_id)
            .fetch_all(&self.pool)
            .instrument(span)
            .await?;
        rows.iter().map(assignment_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn find_assignment(
        &self,
        identity_id: i32,
        course_id: i32,
    ) -> Result<Option<CourseAssignment>, StoreError> {
        let sql = format!(
            "{ASSIGNMENT_SELECT} WHERE fc.faculty = $1 AND fc.course = $2 ORDER BY d.id LIMIT 1"
        );
        let span = info_span!("db.query", db.system = "postgresql", db.operation = "SELECT");
        let row = sqlx::query(&sql)
            .bind(identity_id)
            .bind(course_id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;
        row.as_ref().map(assignment_from_row).transpose()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let acquire_span = info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );
        let mut conn = self.pool.acquire().instrument(acquire_span).await?;
        let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
        conn.ping().instrument(ping_span).await?;
        Ok(())
    }
}
