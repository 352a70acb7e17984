//! Session cookies saved between runs. The refresh token only ever lives in an
//! HTTP-only cookie, so a later `check-auth`, `refresh-token` or `logout` run
//! needs the jar the `login` run ended with. The file holds that cookie in
//! clear text and is written owner-only.

use crate::{app::ApiClient, auth::client::SESSION_COOKIE_PATHS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{io::ErrorKind, path::Path};
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, warn};

#[derive(Debug, Default, Serialize, Deserialize)]
struct SavedSession {
    api_base_url: String,
    cookies: Vec<String>,
}

/// Loads saved cookies into the client's jar. A missing file is an empty
/// session; a file saved for another API base is ignored.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub async fn restore(path: &Path, api: &ApiClient) -> Result<()> {
    let raw = match fs::read(path).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no saved session");
            return Ok(());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    let saved: SavedSession = serde_json::from_slice(&raw)
        .with_context(|| format!("Invalid session file {}", path.display()))?;

    if saved.api_base_url != api.config().api_base_url {
        warn!(
            saved = %saved.api_base_url,
            current = %api.config().api_base_url,
            "session file belongs to another API base, ignoring it"
        );
        return Ok(());
    }

    api.import_cookies(&saved.cookies)?;
    debug!(count = saved.cookies.len(), "restored session cookies");

    Ok(())
}

/// Writes the client's session cookies, or removes the file once the server
/// has cleared them.
///
/// # Errors
/// Returns an error if the file cannot be written or removed.
pub async fn persist(path: &Path, api: &ApiClient) -> Result<()> {
    let cookies = api.export_cookies(SESSION_COOKIE_PATHS)?;

    if cookies.is_empty() {
        return match fs::remove_file(path).await {
            Ok(()) => {
                debug!(path = %path.display(), "session cleared");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("Failed to remove {}", path.display())),
        };
    }

    let saved = SavedSession {
        api_base_url: api.config().api_base_url.clone(),
        cookies,
    };
    let body = serde_json::to_vec_pretty(&saved)?;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options
        .open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;
    file.write_all(&body).await?;
    file.flush().await?;

    debug!(path = %path.display(), "session saved");

    Ok(())
}
