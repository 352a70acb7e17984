pub mod session;
pub mod signup;

// Internal "interpreter" for `Action`.
// We keep the match in a separate module so `mod.rs` stays small as more actions are added.
mod run;

use crate::auth::{ActionResult, AuthStore};
use anyhow::{Result, anyhow};

#[derive(Debug)]
pub enum Action {
    SignUp(signup::Args),
    Session(session::Args),
}

impl Action {
    // Convenience wrapper so call sites can do `action.execute().await`.
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}

/// Prints the outcome of a store operation and turns failures into errors
/// so the process exits non-zero.
fn report(store: &AuthStore, result: &ActionResult, success: &str) -> Result<()> {
    if result.success {
        println!("{}", result.message.as_deref().unwrap_or(success));
        return Ok(());
    }

    let message = result
        .message
        .clone()
        .or_else(|| store.error())
        .unwrap_or_else(|| "Request failed".to_string());
    Err(anyhow!(message))
}
