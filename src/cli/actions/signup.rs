use crate::{
    app::{ApiClient, AppConfig},
    auth::AuthStore,
    cli::{actions::report, session_file},
    signup::{SignUpForm, SubmitOutcome},
};
use anyhow::{Result, anyhow, bail};
use secrecy::SecretString;
use std::{io::IsTerminal, path::PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

#[derive(Debug)]
pub struct Args {
    pub config: AppConfig,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: SecretString,
    pub code: Option<String>,
    pub session_file: Option<PathBuf>,
}

/// Execute the sign-up flow: register, then verify the emailed code.
/// # Errors
/// Returns an error if registration or verification fails.
pub async fn execute(args: Args) -> Result<()> {
    debug!(mode = %args.config.mode, base = %args.config.api_base_url, "signup action");

    let store = AuthStore::new(ApiClient::new(args.config)?);

    if let Some(path) = &args.session_file {
        session_file::restore(path, store.api()).await?;
    }

    let mut form = SignUpForm::new();
    form.set_first_name(args.first_name);
    form.set_last_name(args.last_name);
    form.set_email(args.email);
    form.set_password(args.password);

    register(&store, &form).await?;

    let code = match args.code {
        Some(code) => code,
        None => prompt_code()
            .await?
            .ok_or_else(|| anyhow!("verification code required, pass --code"))?,
    };

    let result = store.verify_email(&code).await;

    if let Some(path) = &args.session_file {
        session_file::persist(path, store.api()).await?;
    }

    report(&store, &result, "Email verified")
}

async fn register(store: &AuthStore, form: &SignUpForm) -> Result<()> {
    println!("{}", form.view(store));

    match form.submit(store).await {
        SubmitOutcome::Navigate(route) => {
            info!(route, "registration accepted");
            println!("Check your inbox, continue at {route}");
            Ok(())
        }
        SubmitOutcome::Failed(message) => {
            eprintln!("{}", form.view(store));
            Err(anyhow!(
                message
                    .or_else(|| store.error())
                    .unwrap_or_else(|| "Error signing up".to_string())
            ))
        }
        SubmitOutcome::Ignored => bail!("a sign-up request is already in flight"),
    }
}

/// Reads the code from stdin when attached to a terminal.
async fn prompt_code() -> Result<Option<String>> {
    if !std::io::stdin().is_terminal() {
        return Ok(None);
    }

    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"Verification code: ").await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await?;

    let code = line.trim();
    Ok((!code.is_empty()).then(|| code.to_string()))
}
