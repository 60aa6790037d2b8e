use secrecy::SecretString;

/// Secrets resolved at startup, kept out of `Args` so they never hit the logs.
#[derive(Clone, Default)]
pub struct GlobalArgs {
    pub db_username: Option<String>,
    pub db_password: Option<SecretString>,
    pub jwt_secret: Option<SecretString>,
}

impl GlobalArgs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_db_credentials(
        mut self,
        username: Option<String>,
        password: Option<SecretString>,
    ) -> Self {
        self.db_username = username;
        self.db_password = password;
        self
    }

    #[must_use]
    pub fn with_jwt_secret(mut self, secret: Option<SecretString>) -> Self {
        self.jwt_secret = secret;
        self
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("db_username", &self.db_username)
            .field("db_password", &self.db_password.as_ref().map(|_| "***"))
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "***"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new()
            .with_db_credentials(Some("aula".to_string()), Some(SecretString::from("pw")))
            .with_jwt_secret(Some(SecretString::from("signing-key")));

        assert_eq!(args.db_username.as_deref(), Some("aula"));
        assert_eq!(
            args.jwt_secret.as_ref().map(|s| s.expose_secret().to_string()),
            Some("signing-key".to_string())
        );

        let rendered = format!("{args:?}");
        assert!(!rendered.contains("signing-key"));
        assert!(!rendered.contains("\"pw\""));
    }
}
