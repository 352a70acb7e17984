use crate::app::{AppConfig, Mode, config::Overrides};
use clap::{Arg, ArgMatches, Command, builder::ValueParser};

pub const ARG_MODE: &str = "mode";
pub const ARG_API_BASE_URL: &str = "api-base-url";
pub const ARG_ORIGIN: &str = "origin";
pub const ARG_TIMEOUT_SECONDS: &str = "timeout-seconds";

#[derive(Debug, Clone)]
pub struct Options {
    pub mode: Mode,
    pub api_base_url: Option<String>,
    pub origin: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl Options {
    /// Parse API endpoint arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the mode is missing.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let mode = matches
            .get_one::<Mode>(ARG_MODE)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_MODE}"))?;

        Ok(Self {
            mode,
            api_base_url: matches.get_one::<String>(ARG_API_BASE_URL).cloned(),
            origin: matches.get_one::<String>(ARG_ORIGIN).cloned(),
            timeout_seconds: matches.get_one::<u64>(ARG_TIMEOUT_SECONDS).copied(),
        })
    }

    #[must_use]
    pub fn into_config(self) -> AppConfig {
        AppConfig::load(
            self.mode,
            Overrides::new(
                self.api_base_url.as_deref(),
                self.origin.as_deref(),
                self.timeout_seconds,
            ),
        )
    }
}

#[must_use]
pub fn validator_mode() -> ValueParser {
    ValueParser::from(move |mode: &str| -> std::result::Result<Mode, String> { mode.parse() })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_MODE)
                .long("mode")
                .help("Build mode selecting the default API base: development or production")
                .env("AUTHFLOW_MODE")
                .default_value("development")
                .global(true)
                .value_parser(validator_mode()),
        )
        .arg(
            Arg::new(ARG_API_BASE_URL)
                .long("api-base-url")
                .help("Override the auth API base URL, example: https://auth.tld/api/v1/auth")
                .env("AUTHFLOW_API_BASE_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_ORIGIN)
                .long("origin")
                .help("Origin used to resolve a relative API base URL, example: https://app.tld")
                .env("AUTHFLOW_ORIGIN")
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT_SECONDS)
                .long("timeout-seconds")
                .help("Request timeout in seconds; requests wait indefinitely when unset")
                .env("AUTHFLOW_TIMEOUT_SECONDS")
                .global(true)
                .value_parser(clap::value_parser!(u64)),
        )
}
