//! Auth feature module: endpoint wrappers, payload types and the session
//! store. It keeps authentication logic out of the views and must stay aligned
//! with the backend's JSON contract. This module handles passwords and access
//! tokens and must avoid logging either.
//!
//! Flow Overview: Signup registers the account, then the verify-email screen
//! submits the emailed code for the registered address. Login stores the access
//! token and confirms the session with a refresh plus `check-auth`. Forgot and
//! reset password are single round trips that return a server message.

pub mod client;
pub mod state;
pub mod types;

pub use state::{ActionResult, AuthStore, SessionState};
pub use types::User;
