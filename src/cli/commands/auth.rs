use clap::{Arg, Command};
use std::path::PathBuf;

pub const CMD_SIGNUP: &str = "signup";
pub const CMD_LOGIN: &str = "login";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_CHECK_AUTH: &str = "check-auth";
pub const CMD_REFRESH_TOKEN: &str = "refresh-token";
pub const CMD_FORGOT_PASSWORD: &str = "forgot-password";
pub const CMD_RESET_PASSWORD: &str = "reset-password";

pub const ARG_FIRST_NAME: &str = "first-name";
pub const ARG_LAST_NAME: &str = "last-name";
pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_CODE: &str = "code";
pub const ARG_TOKEN: &str = "token";
pub const ARG_SESSION_FILE: &str = "session-file";

fn email_arg() -> Arg {
    Arg::new(ARG_EMAIL)
        .short('e')
        .long("email")
        .help("Account email address")
        .env("AUTHFLOW_EMAIL")
        .required(true)
}

fn password_arg() -> Arg {
    Arg::new(ARG_PASSWORD)
        .long("password")
        .help("Account password (prefer AUTHFLOW_PASSWORD over the flag)")
        .env("AUTHFLOW_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

fn signup() -> Command {
    Command::new(CMD_SIGNUP)
        .about("Create an account, then verify the emailed code")
        .arg(
            Arg::new(ARG_FIRST_NAME)
                .long("first-name")
                .help("First name")
                .required(true),
        )
        .arg(
            Arg::new(ARG_LAST_NAME)
                .long("last-name")
                .help("Last name")
                .required(true),
        )
        .arg(email_arg())
        .arg(password_arg())
        .arg(
            Arg::new(ARG_CODE)
                .short('c')
                .long("code")
                .help("Verification code; prompted for on a terminal when omitted"),
        )
}

fn login() -> Command {
    Command::new(CMD_LOGIN)
        .about("Log in and confirm the session")
        .arg(email_arg())
        .arg(password_arg())
}

fn forgot_password() -> Command {
    Command::new(CMD_FORGOT_PASSWORD)
        .about("Send a password reset link")
        .arg(email_arg())
}

fn reset_password() -> Command {
    Command::new(CMD_RESET_PASSWORD)
        .about("Set a new password with a reset token")
        .arg(
            Arg::new(ARG_TOKEN)
                .short('t')
                .long("token")
                .help("Token from the password reset link")
                .env("AUTHFLOW_RESET_TOKEN")
                .hide_env_values(true)
                .required(true),
        )
        .arg(password_arg())
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_SESSION_FILE)
                .long("session-file")
                .help("Keep session cookies in this file so later runs reuse the login")
                .env("AUTHFLOW_SESSION_FILE")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .subcommand(signup())
        .subcommand(login())
        .subcommand(Command::new(CMD_LOGOUT).about("End the current session"))
        .subcommand(
            Command::new(CMD_CHECK_AUTH)
                .about("Refresh the access token and report who is logged in"),
        )
        .subcommand(
            Command::new(CMD_REFRESH_TOKEN).about("Trade the refresh cookie for a new access token"),
        )
        .subcommand(forgot_password())
        .subcommand(reset_password())
}
