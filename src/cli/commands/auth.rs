use clap::{Arg, ArgAction, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_JWT_SECRET: &str = "jwt-secret";
pub const ARG_SESSION_TTL_SECONDS: &str = "session-ttl-seconds";
pub const ARG_PROBE_TTL_SECONDS: &str = "probe-ttl-seconds";
pub const ARG_SELECTION_TTL_SECONDS: &str = "selection-ttl-seconds";
pub const ARG_REQUIRE_SELECTION_TICKET: &str = "require-selection-ticket";
pub const ARG_FRONTEND_BASE_URL: &str = "frontend-base-url";

#[derive(Clone)]
pub struct Options {
    pub jwt_secret: Option<SecretString>,
    pub session_ttl_seconds: i64,
    pub probe_ttl_seconds: i64,
    pub selection_ttl_seconds: i64,
    pub require_selection_ticket: bool,
    pub frontend_base_url: String,
}

impl Options {
    /// Parse auth arguments from matches.
    ///
    /// # Errors
    /// Returns an error if a TTL is not positive or a defaulted argument is missing.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let read_ttl = |id: &str| -> anyhow::Result<i64> {
            let ttl = matches
                .get_one::<i64>(id)
                .copied()
                .ok_or_else(|| anyhow::anyhow!("missing required argument: --{id}"))?;
            anyhow::ensure!(ttl > 0, "--{id} must be greater than zero");
            Ok(ttl)
        };

        Ok(Self {
            jwt_secret: matches
                .get_one::<String>(ARG_JWT_SECRET)
                .filter(|v| !v.trim().is_empty())
                .cloned()
                .map(SecretString::from),
            session_ttl_seconds: read_ttl(ARG_SESSION_TTL_SECONDS)?,
            probe_ttl_seconds: read_ttl(ARG_PROBE_TTL_SECONDS)?,
            selection_ttl_seconds: read_ttl(ARG_SELECTION_TTL_SECONDS)?,
            require_selection_ticket: matches.get_flag(ARG_REQUIRE_SELECTION_TICKET),
            frontend_base_url: matches
                .get_one::<String>(ARG_FRONTEND_BASE_URL)
                .cloned()
                .ok_or_else(|| {
                    anyhow::anyhow!("missing required argument: --{ARG_FRONTEND_BASE_URL}")
                })?,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    let command = with_token_args(command);
    command.arg(
        Arg::new(ARG_FRONTEND_BASE_URL)
            .long(ARG_FRONTEND_BASE_URL)
            .help("Frontend base URL, the only origin allowed by CORS")
            .env("AULA_FRONTEND_BASE_URL")
            .default_value("http://localhost:5173"),
    )
}

fn with_token_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_JWT_SECRET)
                .long(ARG_JWT_SECRET)
                .help("HMAC secret used to sign tokens (a development secret is used when unset)")
                .env("AULA_JWT_SECRET")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_SESSION_TTL_SECONDS)
                .long(ARG_SESSION_TTL_SECONDS)
                .help("Session token TTL in seconds")
                .env("AULA_SESSION_TTL_SECONDS")
                .default_value("86400")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_PROBE_TTL_SECONDS)
                .long(ARG_PROBE_TTL_SECONDS)
                .help("TTL in seconds of tokens issued by check-user and manual-login")
                .env("AULA_PROBE_TTL_SECONDS")
                .default_value("3600")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_SELECTION_TTL_SECONDS)
                .long(ARG_SELECTION_TTL_SECONDS)
                .help("TTL in seconds of the ticket handed out with a pending course selection")
                .env("AULA_SELECTION_TTL_SECONDS")
                .default_value("300")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_REQUIRE_SELECTION_TICKET)
                .long(ARG_REQUIRE_SELECTION_TICKET)
                .help("Reject course selections that don't carry a selection ticket")
                .env("AULA_REQUIRE_SELECTION_TICKET")
                .action(ArgAction::SetTrue),
        )
}
