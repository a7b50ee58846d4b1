//! Map validated CLI arguments to the action the binary executes.

use crate::cli::{
    actions::{Action, db, server},
    commands::{ARG_DSN, ARG_PORT, CMD_DB, CMD_DB_INIT, CMD_DB_RESET, auth},
};
use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use secrecy::SecretString;

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some((CMD_DB, sub_m)) => db_action(sub_m),
        Some((other, _)) => Err(anyhow!("unknown subcommand: {other}")),
        None => {
            let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(3000);
            let dsn = dsn(matches)?;
            let auth = auth::Options::parse(matches)?;

            Ok(Action::Server(server::Args { port, dsn, auth }))
        }
    }
}

fn db_action(matches: &ArgMatches) -> Result<Action> {
    let (operation, sub_m) = match matches.subcommand() {
        Some((CMD_DB_INIT, sub_m)) => (db::Operation::Init, sub_m),
        Some((CMD_DB_RESET, sub_m)) => (db::Operation::Reset, sub_m),
        _ => return Err(anyhow!("missing db subcommand: {CMD_DB_INIT} or {CMD_DB_RESET}")),
    };

    Ok(Action::Db(db::Args {
        dsn: dsn(sub_m)?,
        operation,
    }))
}

fn dsn(matches: &ArgMatches) -> Result<SecretString> {
    matches
        .get_one::<String>(ARG_DSN)
        .map(|dsn| SecretString::from(dsn.clone()))
        .context("missing required argument: --dsn")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    const DSN: &str = "postgres://vestly@localhost:5432/vestly";

    fn clean_env() -> [(&'static str, Option<&'static str>); 5] {
        [
            ("VESTLY_DSN", None),
            ("VESTLY_PORT", None),
            ("VESTLY_AUTH_URL", None),
            ("GOOGLE_CLIENT_ID", None),
            ("GOOGLE_CLIENT_SECRET", None),
        ]
    }

    #[test]
    fn server_is_the_default_action() {
        temp_env::with_vars(clean_env(), || {
            let matches = commands::new().get_matches_from(vec!["vestly", "--dsn", DSN]);
            let Action::Server(args) = handler(&matches).unwrap() else {
                panic!("expected server action");
            };
            assert_eq!(args.port, 3000);
            assert_eq!(args.dsn.expose_secret(), DSN);
            assert_eq!(args.auth.auth_url.as_str(), "http://localhost:3001/");
        });
    }

    #[test]
    fn server_requires_dsn() {
        temp_env::with_vars(clean_env(), || {
            let matches = commands::new().get_matches_from(vec!["vestly"]);
            let err = handler(&matches).unwrap_err();
            assert_eq!(err.to_string(), "missing required argument: --dsn");
        });
    }

    #[test]
    fn db_init_maps_to_db_action() {
        temp_env::with_vars(clean_env(), || {
            let matches =
                commands::new().get_matches_from(vec!["vestly", "--dsn", DSN, "db", "init"]);
            let Action::Db(args) = handler(&matches).unwrap() else {
                panic!("expected db action");
            };
            assert_eq!(args.operation, db::Operation::Init);
            assert_eq!(args.dsn.expose_secret(), DSN);
        });
    }

    #[test]
    fn db_reset_requires_dsn() {
        temp_env::with_vars(clean_env(), || {
            let matches = commands::new().get_matches_from(vec!["vestly", "db", "reset"]);
            assert!(handler(&matches).is_err());
        });
    }
}
