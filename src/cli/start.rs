use crate::cli::{
    actions::Action,
    commands::{self, logging},
    dispatch::handler,
    telemetry::{self, LogFormat},
};
use anyhow::Result;
use clap::ArgMatches;
use tracing::Level;

fn get_verbosity_level(matches: &ArgMatches) -> Option<Level> {
    match matches.get_one::<u8>(logging::ARG_VERBOSITY).copied() {
        Some(0) | None => None,
        Some(1) => Some(Level::WARN),
        Some(2) => Some(Level::INFO),
        Some(3) => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

fn get_log_format(matches: &ArgMatches) -> Result<LogFormat> {
    matches
        .get_one::<String>(logging::ARG_LOG_FORMAT)
        .map_or(Ok(LogFormat::default()), |format| format.parse())
}

/// Start the CLI
///
/// # Errors
///
/// Returns an error if logging cannot be initialized or the arguments do not
/// map to an action.
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    let verbosity_level = get_verbosity_level(&matches);

    telemetry::init(verbosity_level, get_log_format(&matches)?)?;

    let action = handler(&matches)?;

    Ok(action)
}
