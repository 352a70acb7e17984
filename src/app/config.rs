//! Endpoint configuration for the auth API. The base URL is chosen by build
//! mode and can be overridden at runtime (CLI flags or environment) without
//! rebuilding. Configuration values are public; do not store secrets here.

use super::errors::AppError;
use std::{fmt, str::FromStr, time::Duration};
use url::Url;

/// Auth API base used while developing against a local backend.
pub const DEV_API_BASE_URL: &str = "http://localhost:5000/api/v1/auth";
/// Auth API base used when served behind the same origin as the frontend.
pub const PROD_API_BASE_URL: &str = "/api/v1/auth";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    #[must_use]
    pub const fn default_api_base_url(self) -> &'static str {
        match self {
            Self::Development => DEV_API_BASE_URL,
            Self::Production => PROD_API_BASE_URL,
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("invalid mode: {other}")),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(formatter, "development"),
            Self::Production => write!(formatter, "production"),
        }
    }
}

/// Client configuration derived from the mode plus optional overrides.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub mode: Mode,
    pub api_base_url: String,
    pub origin: Option<String>,
    /// Requests wait for the server indefinitely unless a timeout is set.
    pub timeout: Option<Duration>,
}

impl AppConfig {
    /// Defaults for the given mode.
    #[must_use]
    pub fn for_mode(mode: Mode) -> Self {
        Self {
            mode,
            api_base_url: mode.default_api_base_url().to_string(),
            origin: None,
            timeout: None,
        }
    }

    /// Loads the mode defaults and applies the provided overrides.
    #[must_use]
    pub fn load(mode: Mode, overrides: Overrides) -> Self {
        let mut config = Self::for_mode(mode);
        apply_overrides(&mut config, overrides);
        config
    }

    /// Resolves an endpoint path against the API base.
    ///
    /// # Errors
    /// Returns `AppError::Config` when the base is relative and no origin is
    /// configured, or when the resulting URL does not parse.
    pub fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        let joined = join_base(&self.api_base_url, path);

        match Url::parse(&joined) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let origin = self.origin.as_deref().ok_or_else(|| {
                    AppError::Config(format!(
                        "API base URL '{}' is relative; an origin is required",
                        self.api_base_url
                    ))
                })?;
                Url::parse(origin)
                    .and_then(|origin| origin.join(&joined))
                    .map_err(|err| AppError::Config(format!("Invalid origin '{origin}': {err}")))
            }
            Err(err) => Err(AppError::Config(format!(
                "Invalid API URL '{joined}': {err}"
            ))),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_mode(Mode::default())
    }
}

/// Runtime overrides; empty or whitespace-only values are ignored.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub api_base_url: Option<String>,
    pub origin: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl Overrides {
    #[must_use]
    pub fn new(
        api_base_url: Option<&str>,
        origin: Option<&str>,
        timeout_seconds: Option<u64>,
    ) -> Self {
        Self {
            api_base_url: api_base_url.and_then(normalize_value),
            origin: origin.and_then(normalize_value),
            timeout_seconds,
        }
    }
}

fn apply_overrides(config: &mut AppConfig, overrides: Overrides) {
    if let Some(value) = overrides.api_base_url {
        config.api_base_url = value;
    }
    if let Some(value) = overrides.origin {
        config.origin = Some(value);
    }
    if let Some(seconds) = overrides.timeout_seconds.filter(|seconds| *seconds > 0) {
        config.timeout = Some(Duration::from_secs(seconds));
    }
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Joins the base URL and path with exactly one slash between them.
fn join_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}
