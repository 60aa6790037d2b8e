//! Auth configuration and the shared state handed to handlers.

use secrecy::SecretString;
use std::{fmt, sync::Arc};

use super::store::CredentialStore;
use super::token::TokenIssuer;

const DEFAULT_SESSION_TTL_SECONDS: i64 = 24 * 60 * 60;
const DEFAULT_PROBE_TTL_SECONDS: i64 = 60 * 60;
const DEFAULT_SELECTION_TTL_SECONDS: i64 = 5 * 60;

/// Signing secret used when none is configured. Local development only.
pub const DEVELOPMENT_JWT_SECRET: &str = "aula-development-secret";

#[derive(Clone)]
pub struct AuthConfig {
    jwt_secret: SecretString,
    session_ttl_seconds: i64,
    probe_ttl_seconds: i64,
    selection_ttl_seconds: i64,
    require_selection_ticket: bool,
}

impl AuthConfig {
    #[must_use]
    pub fn new(jwt_secret: SecretString) -> Self {
        Self {
            jwt_secret,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            probe_ttl_seconds: DEFAULT_PROBE_TTL_SECONDS,
            selection_ttl_seconds: DEFAULT_SELECTION_TTL_SECONDS,
            require_selection_ticket: false,
        }
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_probe_ttl_seconds(mut self, seconds: i64) -> Self {
        self.probe_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_selection_ttl_seconds(mut self, seconds: i64) -> Self {
        self.selection_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_require_selection_ticket(mut self, required: bool) -> Self {
        self.require_selection_ticket = required;
        self
    }

    #[must_use]
    pub const fn jwt_secret(&self) -> &SecretString {
        &self.jwt_secret
    }

    #[must_use]
    pub const fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    #[must_use]
    pub const fn probe_ttl_seconds(&self) -> i64 {
        self.probe_ttl_seconds
    }

    #[must_use]
    pub const fn selection_ttl_seconds(&self) -> i64 {
        self.selection_ttl_seconds
    }

    #[must_use]
    pub const fn require_selection_ticket(&self) -> bool {
        self.require_selection_ticket
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"***")
            .field("session_ttl_seconds", &self.session_ttl_seconds)
            .field("probe_ttl_seconds", &self.probe_ttl_seconds)
            .field("selection_ttl_seconds", &self.selection_ttl_seconds)
            .field("require_selection_ticket", &self.require_selection_ticket)
            .finish()
    }
}

/// Everything a request needs: config, the store gateway and the issuer.
/// Immutable after startup, shared behind an `Arc`.
pub struct AuthState {
    config: AuthConfig,
    store: Arc<dyn CredentialStore>,
    tokens: TokenIssuer,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, store: Arc<dyn CredentialStore>) -> Self {
        let tokens = TokenIssuer::new(&config);
        Self {
            config,
            store,
            tokens,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &dyn CredentialStore {
        self.store.as_ref()
    }

    #[must_use]
    pub const fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }
}

impl fmt::Debug for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthState")
            .field("config", &self.config)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn defaults_match_session_and_probe_lifetimes() {
        let config = AuthConfig::new(SecretString::from("s"));
        assert_eq!(config.session_ttl_seconds(), 86_400);
        assert_eq!(config.probe_ttl_seconds(), 3_600);
        assert_eq!(config.selection_ttl_seconds(), 300);
        assert!(!config.require_selection_ticket());
    }

    #[test]
    fn builders_override_defaults() {
        let config = AuthConfig::new(SecretString::from("s"))
            .with_session_ttl_seconds(10)
            .with_probe_ttl_seconds(20)
            .with_selection_ttl_seconds(30)
            .with_require_selection_ticket(true);
        assert_eq!(config.session_ttl_seconds(), 10);
        assert_eq!(config.probe_ttl_seconds(), 20);
        assert_eq!(config.selection_ttl_seconds(), 30);
        assert!(config.require_selection_ticket());
        assert_eq!(config.jwt_secret().expose_secret(), "s");
    }

    #[test]
    fn debug_redacts_secret() {
        let config = AuthConfig::new(SecretString::from("super-secret"));
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
