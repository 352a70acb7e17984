use thiserror::Error;

/// Coarse grouping used by callers that only care whether the server was reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Validation,
}

#[derive(Clone, Debug, Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Http {
        status: u16,
        message: Option<String>,
    },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
    #[error("{0}")]
    Validation(String),
}

impl AppError {
    /// Network, timeout and decode failures never carried a server verdict.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) | Self::Timeout(_) | Self::Parse(_) => ErrorKind::Network,
            Self::Http { .. } | Self::Config(_) | Self::Serialization(_) | Self::Validation(_) => {
                ErrorKind::Validation
            }
        }
    }

    /// Returns the `message` field of the server's error body, if one was sent.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Server message when present, otherwise the caller's default.
    #[must_use]
    pub fn message_or(&self, default: &str) -> String {
        self.server_message().unwrap_or(default).to_string()
    }
}
