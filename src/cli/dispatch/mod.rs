//! Maps validated CLI matches to the action the binary runs.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{auth, database};
use crate::cli::globals::GlobalArgs;
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let database_opts = database::Options::parse(matches);
    let auth_opts = auth::Options::parse(matches)?;

    let globals = GlobalArgs::new()
        .with_db_credentials(database_opts.username, database_opts.password)
        .with_jwt_secret(auth_opts.jwt_secret);

    Ok(Action::Server(Args {
        port,
        dsn,
        globals,
        session_ttl_seconds: auth_opts.session_ttl_seconds,
        probe_ttl_seconds: auth_opts.probe_ttl_seconds,
        selection_ttl_seconds: auth_opts.selection_ttl_seconds,
        require_selection_ticket: auth_opts.require_selection_ticket,
        frontend_base_url: auth_opts.frontend_base_url,
    }))
}
