//! Shared client utilities for API access, configuration and errors.
//!
//! ## Session transport
//!
//! The auth API keeps the refresh token in an `HttpOnly` cookie and hands out a
//! short-lived access token in JSON bodies. The cookie jar lives in
//! [`ApiClient`], so every request carries the session cookie the way a browser
//! sends credentials; the access token is attached explicitly as a bearer header
//! only where an endpoint asks for it.
//!
//! Centralizing these helpers keeps network behavior consistent across the auth
//! store and the CLI. They do not keep secrets themselves, but callers must
//! still avoid logging passwords and tokens.

pub mod api;
pub mod config;
pub mod errors;

pub use api::ApiClient;
pub use config::{AppConfig, Mode};
pub use errors::{AppError, ErrorKind};
