//! Credential validation: field presence first, then one exact-match lookup.

use std::fmt;

use tracing::debug;

use super::error::AuthError;
use super::identity::Identity;
use super::store::CredentialStore;

/// An email/secret pair that passed the presence check.
#[derive(Clone, Copy)]
pub struct Credentials<'a> {
    email: &'a str,
    secret: &'a str,
}

impl<'a> Credentials<'a> {
    /// Both fields must be present and not blank. Runs before any store access.
    ///
    /// # Errors
    /// Returns [`AuthError::MissingCredentials`] when either field is absent.
    pub fn require(email: Option<&'a str>, secret: Option<&'a str>) -> Result<Self, AuthError> {
        match (present(email), present(secret)) {
            (Some(email), Some(secret)) => Ok(Self { email, secret }),
            _ => Err(AuthError::MissingCredentials),
        }
    }

    #[must_use]
    pub const fn email(&self) -> &'a str {
        self.email
    }
}

impl fmt::Debug for Credentials<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("secret", &"***")
            .finish()
    }
}

/// Treat `None`, empty and whitespace-only values alike.
pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

/// Resolve credentials to exactly one identity.
///
/// # Errors
/// [`AuthError::InvalidCredentials`] when nothing matches,
/// [`AuthError::StoreUnavailable`] when the lookup itself fails.
pub async fn verify(
    store: &dyn CredentialStore,
    credentials: Credentials<'_>,
) -> Result<Identity, AuthError> {
    match store
        .find_by_credentials(credentials.email, credentials.secret)
        .await?
    {
        Some(identity) => Ok(identity),
        None => {
            debug!(email = credentials.email, "no identity matches credentials");
            Err(AuthError::InvalidCredentials)
        }
    }
}
