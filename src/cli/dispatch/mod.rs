//! Command-line argument dispatch.
//!
//! This module maps validated CLI matches to the action to run, resolving the
//! API configuration once so every action talks to the same base URL.

use crate::cli::actions::{
    Action,
    session::{self, Operation},
    signup,
};
use crate::cli::commands::{api, auth};
use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use secrecy::SecretString;
use std::path::PathBuf;

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .with_context(|| format!("missing required argument: --{id}"))
}

/// Passwords are taken verbatim; surrounding whitespace is part of the secret.
fn required_secret(matches: &ArgMatches, id: &str) -> Result<SecretString> {
    matches
        .get_one::<String>(id)
        .filter(|value| !value.is_empty())
        .map(|value| SecretString::from(value.clone()))
        .with_context(|| format!("missing required argument: --{id}"))
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or the subcommand is unknown.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let config = api::Options::parse(matches)?.into_config();
    let session_file = matches.get_one::<PathBuf>(auth::ARG_SESSION_FILE).cloned();

    let action = match matches.subcommand() {
        Some((auth::CMD_SIGNUP, sub)) => Action::SignUp(signup::Args {
            config,
            first_name: required(sub, auth::ARG_FIRST_NAME)?,
            last_name: required(sub, auth::ARG_LAST_NAME)?,
            email: required(sub, auth::ARG_EMAIL)?,
            password: required_secret(sub, auth::ARG_PASSWORD)?,
            code: sub
                .get_one::<String>(auth::ARG_CODE)
                .map(|code| code.trim().to_string())
                .filter(|code| !code.is_empty()),
            session_file,
        }),
        Some((name, sub)) => Action::Session(session::Args {
            config,
            operation: operation(name, sub)?,
            session_file,
        }),
        None => return Err(anyhow!("missing subcommand")),
    };

    Ok(action)
}

fn operation(name: &str, matches: &ArgMatches) -> Result<Operation> {
    let operation = match name {
        auth::CMD_LOGIN => Operation::Login {
            email: required(matches, auth::ARG_EMAIL)?,
            password: required_secret(matches, auth::ARG_PASSWORD)?,
        },
        auth::CMD_LOGOUT => Operation::Logout,
        auth::CMD_CHECK_AUTH => Operation::CheckAuth,
        auth::CMD_REFRESH_TOKEN => Operation::RefreshToken,
        auth::CMD_FORGOT_PASSWORD => Operation::ForgotPassword {
            email: required(matches, auth::ARG_EMAIL)?,
        },
        auth::CMD_RESET_PASSWORD => Operation::ResetPassword {
            token: required(matches, auth::ARG_TOKEN)?,
            password: required_secret(matches, auth::ARG_PASSWORD)?,
        },
        other => return Err(anyhow!("unknown subcommand: {other}")),
    };

    Ok(operation)
}
