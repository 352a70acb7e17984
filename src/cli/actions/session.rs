use crate::{
    app::{ApiClient, AppConfig},
    auth::{AuthStore, SessionState},
    cli::{actions::report, session_file},
};
use anyhow::{Result, anyhow};
use secrecy::SecretString;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug)]
pub enum Operation {
    Login {
        email: String,
        password: SecretString,
    },
    Logout,
    CheckAuth,
    RefreshToken,
    ForgotPassword {
        email: String,
    },
    ResetPassword {
        token: String,
        password: SecretString,
    },
}

#[derive(Debug)]
pub struct Args {
    pub config: AppConfig,
    pub operation: Operation,
    pub session_file: Option<PathBuf>,
}

/// Execute a single session operation against a fresh store.
/// # Errors
/// Returns an error if the client cannot be built or the operation fails.
pub async fn execute(args: Args) -> Result<()> {
    debug!(mode = %args.config.mode, base = %args.config.api_base_url, "session action");

    let store = AuthStore::new(ApiClient::new(args.config)?);

    if let Some(path) = &args.session_file {
        session_file::restore(path, store.api()).await?;
    }

    let outcome = run(&store, args.operation).await;

    if let Some(path) = &args.session_file {
        session_file::persist(path, store.api()).await?;
    }

    outcome
}

async fn run(store: &AuthStore, operation: Operation) -> Result<()> {
    match operation {
        Operation::Login { email, password } => {
            let result = store.login(&email, &password).await;
            report(store, &result, "Logged in")?;
            print!("{}", describe(&store.snapshot()));
            Ok(())
        }
        Operation::Logout => {
            let result = store.logout().await;
            report(store, &result, "Logged out")
        }
        Operation::CheckAuth => {
            store.check_auth().await;
            let state = store.snapshot();
            print!("{}", describe(&state));
            if state.is_authenticated {
                Ok(())
            } else {
                Err(anyhow!("not authenticated"))
            }
        }
        Operation::RefreshToken => match store.refresh_access_token().await {
            Some(_) => {
                println!("Access token refreshed");
                Ok(())
            }
            None => Err(anyhow!("failed to refresh access token")),
        },
        Operation::ForgotPassword { email } => {
            let result = store.forgot_password(&email).await;
            report(store, &result, "Password reset link sent")
        }
        Operation::ResetPassword { token, password } => {
            let result = store.reset_password(&token, &password).await;
            report(store, &result, "Password reset")
        }
    }
}

/// Session summary for the terminal. Never includes the access token.
fn describe(state: &SessionState) -> String {
    let mut out = format!(
        "authenticated: {}\n",
        if state.is_authenticated { "yes" } else { "no" }
    );

    if let Some(user) = &state.user {
        let name = [user.first_name(), user.last_name()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if !name.is_empty() {
            out.push_str(&format!("name: {name}\n"));
        }
        if let Some(email) = user.email() {
            out.push_str(&format!("email: {email}\n"));
        }
        if let Some(verified) = user.is_verified() {
            out.push_str(&format!(
                "verified: {}\n",
                if verified { "yes" } else { "no" }
            ));
        }
    }

    out
}
