use crate::{
    aula::{self, auth::AuthConfig, auth::DEVELOPMENT_JWT_SECRET},
    cli::globals::GlobalArgs,
};
use anyhow::{anyhow, Result};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub globals: GlobalArgs,
    pub session_ttl_seconds: i64,
    pub probe_ttl_seconds: i64,
    pub selection_ttl_seconds: i64,
    pub require_selection_ticket: bool,
    pub frontend_base_url: String,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the DSN is invalid or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let dsn = database_url(&args.dsn, &args.globals)?;

    debug!("Global args: {:?}", args.globals);

    let auth_config = auth_config(&args);

    aula::new(args.port, dsn, auth_config, &args.frontend_base_url).await
}

/// Put the configured username/password into the DSN, leaving it alone when unset.
fn database_url(dsn: &str, globals: &GlobalArgs) -> Result<String> {
    let mut dsn = Url::parse(dsn)?;

    if let Some(username) = &globals.db_username {
        dsn.set_username(username)
            .map_err(|()| anyhow!("Error setting username"))?;
    }

    if let Some(password) = &globals.db_password {
        dsn.set_password(Some(password.expose_secret()))
            .map_err(|()| anyhow!("Error setting password"))?;
    }

    Ok(dsn.to_string())
}

fn auth_config(args: &Args) -> AuthConfig {
    let jwt_secret = args.globals.jwt_secret.clone().unwrap_or_else(|| {
        warn!("No JWT secret configured, signing tokens with the development secret");
        SecretString::from(DEVELOPMENT_JWT_SECRET)
    });

    AuthConfig::new(jwt_secret)
        .with_session_ttl_seconds(args.session_ttl_seconds)
        .with_probe_ttl_seconds(args.probe_ttl_seconds)
        .with_selection_ttl_seconds(args.selection_ttl_seconds)
        .with_require_selection_ticket(args.require_selection_ticket)
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("dsn", redact_dsn(&args.dsn)),
        ("frontend_base_url", args.frontend_base_url.clone()),
        ("session_ttl_seconds", args.session_ttl_seconds.to_string()),
        ("probe_ttl_seconds", args.probe_ttl_seconds.to_string()),
        ("selection_ttl_seconds", args.selection_ttl_seconds.to_string()),
        (
            "require_selection_ticket",
            args.require_selection_ticket.to_string(),
        ),
        ("jwt_secret_set", args.globals.jwt_secret.is_some().to_string()),
    ];

    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "{} {} - {}\n\nStartup configuration:",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH)
    );
    for (key, value) in entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn redact_dsn(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("REDACTED"));
            }
            parsed.to_string()
        }
        Err(_) => "invalid-dsn".to_string(),
    }
}

fn short_commit(hash: &str) -> String {
    let trimmed = hash.trim();
    if trimmed.len() > 7 {
        trimmed[..7].to_string()
    } else {
        trimmed.to_string()
    }
}
