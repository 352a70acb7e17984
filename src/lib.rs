//! # Authflow
//!
//! `authflow` is the client side of a REST authentication API: a sign-up form
//! with a live password strength meter, and a session store that tracks the
//! logged-in user and the short-lived access token.
//!
//! ## Session model
//!
//! The server keeps a refresh token in an HTTP-only cookie. Every request goes
//! through one cookie-aware [`app::ApiClient`], so the cookie set by `login` is
//! replayed on `refresh-token` and `logout` the same way a browser would send
//! it. The access token lives only in memory inside [`auth::AuthStore`] and is
//! sent as a bearer header to `check-auth`.
//!
//! ## Modules
//!
//! - [`app`]: configuration, HTTP client and error mapping.
//! - [`auth`]: endpoint wrappers, wire types and the session store.
//! - [`signup`]: the sign-up form and password strength meter.
//! - [`cli`]: the `authflow` command line front end.

pub mod app;
pub mod auth;
pub mod cli;
pub mod signup;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
