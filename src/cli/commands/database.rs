use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_DB_USERNAME: &str = "db-username";
pub const ARG_DB_PASSWORD: &str = "db-password";

#[derive(Clone, Default)]
pub struct Options {
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        let read_optional = |id: &str| -> Option<String> {
            matches
                .get_one::<String>(id)
                .cloned()
                .filter(|v| !v.trim().is_empty())
        };

        Self {
            username: read_optional(ARG_DB_USERNAME),
            password: read_optional(ARG_DB_PASSWORD).map(SecretString::from),
        }
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_DB_USERNAME)
                .long(ARG_DB_USERNAME)
                .help("Database username, overrides the one in the DSN")
                .env("AULA_DB_USERNAME"),
        )
        .arg(
            Arg::new(ARG_DB_PASSWORD)
                .long(ARG_DB_PASSWORD)
                .help("Database password, overrides the one in the DSN")
                .env("AULA_DB_PASSWORD")
                .hide_env_values(true),
        )
}
