use crate::cli::actions::{Action, session, signup};
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
// To add a new action, add a new `Action::*` variant and a corresponding `*::execute` call here.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::SignUp(args) => signup::execute(args).await,
        Action::Session(args) => session::execute(args).await,
    }
}
