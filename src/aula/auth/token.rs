//! Token issuance: HS256-signed claim sets, one shape per login branch.

use std::{fmt, time::SystemTime};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use super::error::AuthError;
use super::identity::{CourseAssignment, Identity, Role};
use super::state::AuthConfig;

/// Audience of pending-selection tickets, so they can never pass as sessions.
pub const SELECTION_AUDIENCE: &str = "aula-selection";

/// Claims of an administrator session; also the `user` object of the reply.
#[derive(ToSchema, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Claims of a staff session bound to one course.
#[derive(ToSchema, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyUser {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub staff_identifier: Option<String>,
    pub role: Role,
    pub course_id: i32,
    pub course_code: String,
}

/// Claims of the short-lived generic token of the auxiliary entry points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeClaims {
    pub id: i32,
    pub email: String,
    pub role: Option<String>,
}

/// Signed claims: the user fields plus issue and expiry times.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims<T> {
    #[serde(flatten)]
    pub user: T,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct SelectionClaims {
    sub: String,
    aud: String,
    iat: i64,
    exp: i64,
}

pub(crate) fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_ttl_seconds: i64,
    probe_ttl_seconds: i64,
    selection_ttl_seconds: i64,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("key", &"***")
            .field("session_ttl_seconds", &self.session_ttl_seconds)
            .field("probe_ttl_seconds", &self.probe_ttl_seconds)
            .field("selection_ttl_seconds", &self.selection_ttl_seconds)
            .finish()
    }
}

impl TokenIssuer {
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret().expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            session_ttl_seconds: config.session_ttl_seconds(),
            probe_ttl_seconds: config.probe_ttl_seconds(),
            selection_ttl_seconds: config.selection_ttl_seconds(),
        }
    }

    /// # Errors
    /// [`AuthError::TokenIssue`] if signing fails.
    pub fn issue_admin(&self, identity: &Identity) -> Result<(String, AdminUser), AuthError> {
        let user = AdminUser {
            id: identity.id,
            email: identity.email.clone(),
            name: identity.display_name.clone(),
            role: Role::Administrator,
        };
        let token = self.sign(&user, self.session_ttl_seconds)?;
        Ok((token, user))
    }

    /// # Errors
    /// [`AuthError::TokenIssue`] if signing fails.
    pub fn issue_faculty(
        &self,
        identity: &Identity,
        course: &CourseAssignment,
    ) -> Result<(String, FacultyUser), AuthError> {
        let user = FacultyUser {
            id: identity.id,
            email: identity.email.clone(),
            name: identity.display_name.clone(),
            staff_identifier: identity.staff_identifier.clone(),
            role: Role::Staff,
            course_id: course.course_id,
            course_code: course.course_code.clone(),
        };
        let token = self.sign(&user, self.session_ttl_seconds)?;
        Ok((token, user))
    }

    /// # Errors
    /// [`AuthError::TokenIssue`] if signing fails.
    pub fn issue_probe(&self, identity: &Identity) -> Result<(String, ProbeClaims), AuthError> {
        let claims = ProbeClaims {
            id: identity.id,
            email: identity.email.clone(),
            role: identity.role_name.clone(),
        };
        let token = self.sign(&claims, self.probe_ttl_seconds)?;
        Ok((token, claims))
    }

    /// Ticket tying a pending course selection to the identity that passed the
    /// credential check.
    ///
    /// # Errors
    /// [`AuthError::TokenIssue`] if signing fails.
    pub fn issue_selection_ticket(&self, identity_id: i32) -> Result<String, AuthError> {
        let iat = now_unix_seconds();
        let claims = SelectionClaims {
            sub: identity_id.to_string(),
            aud: SELECTION_AUDIENCE.to_string(),
            iat,
            exp: iat.saturating_add(self.selection_ttl_seconds),
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(AuthError::TokenIssue)
    }

    /// # Errors
    /// [`AuthError::UnauthorizedCourseSelection`] if the ticket is invalid,
    /// expired, or issued for another identity.
    pub fn verify_selection_ticket(&self, ticket: &str, identity_id: i32) -> Result<(), AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[SELECTION_AUDIENCE]);
        validation.set_required_spec_claims(&["exp", "aud", "sub"]);

        let data = jsonwebtoken::decode::<SelectionClaims>(ticket, &self.decoding_key, &validation)
            .map_err(|e| {
                debug!("Rejected selection ticket: {e}");
                AuthError::UnauthorizedCourseSelection
            })?;

        if data.claims.sub != identity_id.to_string() {
            debug!(identity_id, "selection ticket issued for another identity");
            return Err(AuthError::UnauthorizedCourseSelection);
        }

        Ok(())
    }

    /// Decode and validate a token signed by this issuer.
    ///
    /// # Errors
    /// Returns the underlying error for a bad signature, malformed token or
    /// expired claims.
    pub fn verify<T: DeserializeOwned>(
        &self,
        token: &str,
    ) -> Result<SessionClaims<T>, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        jsonwebtoken::decode::<SessionClaims<T>>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
    }

    fn sign<T: Serialize>(&self, user: &T, ttl_seconds: i64) -> Result<String, AuthError> {
        let iat = now_unix_seconds();
        let claims = SessionClaims {
            user,
            iat,
            exp: iat.saturating_add(ttl_seconds),
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(AuthError::TokenIssue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aula::auth::test_support::{course, identity};
    use secrecy::SecretString;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&AuthConfig::new(SecretString::from("test-secret")))
    }

    #[test]
    fn admin_token_carries_admin_role() -> Result<(), Box<dyn std::error::Error>> {
        let issuer = issuer();
        let (token, user) = issuer.issue_admin(&identity(7, "a@x.edu", 1))?;
        let claims: SessionClaims<AdminUser> = issuer.verify(&token)?;
        assert_eq!(claims.user, user);
        assert_eq!(claims.user.role, Role::Administrator);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
        Ok(())
    }

    #[test]
    fn faculty_token_binds_course() -> Result<(), Box<dyn std::error::Error>> {
        let issuer = issuer();
        let (token, user) = issuer.issue_faculty(&identity(8, "b@x.edu", 2), &course(5, "CS101"))?;
        let claims: SessionClaims<serde_json::Value> = issuer.verify(&token)?;
        assert_eq!(claims.user["role"], "faculty");
        assert_eq!(claims.user["courseId"], 5);
        assert_eq!(claims.user["courseCode"], "CS101");
        assert_eq!(claims.user["staffIdentifier"], "FAC-008");
        assert_eq!(user.course_id, 5);
        Ok(())
    }

    #[test]
    fn probe_token_lives_one_hour() -> Result<(), Box<dyn std::error::Error>> {
        let issuer = issuer();
        let (token, claims) = issuer.issue_probe(&identity(7, "a@x.edu", 1))?;
        let decoded: SessionClaims<ProbeClaims> = issuer.verify(&token)?;
        assert_eq!(decoded.user, claims);
        assert_eq!(decoded.user.role.as_deref(), Some("admin"));
        assert_eq!(decoded.exp - decoded.iat, 60 * 60);
        Ok(())
    }

    #[test]
    fn token_from_other_secret_is_rejected() -> Result<(), AuthError> {
        let (token, _) = issuer().issue_admin(&identity(7, "a@x.edu", 1))?;
        let other = TokenIssuer::new(&AuthConfig::new(SecretString::from("other-secret")));
        assert!(other.verify::<AdminUser>(&token).is_err());
        Ok(())
    }

    #[test]
    fn expired_token_is_rejected() -> Result<(), AuthError> {
        let config = AuthConfig::new(SecretString::from("test-secret"))
            .with_session_ttl_seconds(-3600);
        let issuer = TokenIssuer::new(&config);
        let (token, _) = issuer.issue_admin(&identity(7, "a@x.edu", 1))?;
        assert!(issuer.verify::<AdminUser>(&token).is_err());
        Ok(())
    }

    #[test]
    fn selection_ticket_is_bound_to_identity() -> Result<(), AuthError> {
        let issuer = issuer();
        let ticket = issuer.issue_selection_ticket(9)?;
        issuer.verify_selection_ticket(&ticket, 9)?;
        assert!(matches!(
            issuer.verify_selection_ticket(&ticket, 10),
            Err(AuthError::UnauthorizedCourseSelection)
        ));
        Ok(())
    }

    #[test]
    fn session_token_is_not_a_selection_ticket() -> Result<(), AuthError> {
        let issuer = issuer();
        let (token, _) = issuer.issue_faculty(&identity(9, "c@x.edu", 2), &course(5, "CS101"))?;
        assert!(matches!(
            issuer.verify_selection_ticket(&token, 9),
            Err(AuthError::UnauthorizedCourseSelection)
        ));
        Ok(())
    }

    #[test]
    fn debug_hides_key() {
        let rendered = format!("{:?}", issuer());
        assert!(!rendered.contains("test-secret"));
    }
}
