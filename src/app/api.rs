//! HTTP helpers for the JSON auth API with a shared cookie jar and uniform
//! error mapping. Feature clients use these helpers instead of building
//! requests themselves. The helpers never log request bodies or bearer tokens;
//! they only attach what callers hand them.

use super::{config::AppConfig, errors::AppError};
use reqwest::{
    Client, RequestBuilder, Response,
    cookie::{CookieStore, Jar},
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::sync::Arc;
use tracing::{Instrument, debug, info_span};

/// Maximum number of error message characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;

/// Error body shape returned by the auth API.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Cookie-carrying client bound to one API base.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    jar: Arc<Jar>,
    config: AppConfig,
}

impl ApiClient {
    /// Builds a client with a cookie store so session cookies ride along on
    /// every request, like a browser sending credentials.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the underlying HTTP client cannot be built.
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let jar = Arc::new(Jar::default());

        let mut builder = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .cookie_provider(Arc::clone(&jar));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self { http, jar, config })
    }

    /// Configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Cookies the jar would send to any of `paths`, as `name=value` pairs.
    /// A name seen on several paths is kept once.
    ///
    /// # Errors
    /// Returns `AppError::Config` if a path does not resolve against the base.
    pub fn export_cookies(&self, paths: &[&str]) -> Result<Vec<String>, AppError> {
        let mut pairs: Vec<String> = Vec::new();

        for path in paths {
            let url = self.config.endpoint(path)?;
            let Some(header) = self.jar.cookies(&url) else {
                continue;
            };
            let Ok(header) = header.to_str() else {
                continue;
            };
            for pair in header.split(';').map(str::trim).filter(|pair| !pair.is_empty()) {
                let name = cookie_name(pair);
                if !pairs.iter().any(|known| cookie_name(known) == name) {
                    pairs.push(pair.to_string());
                }
            }
        }

        Ok(pairs)
    }

    /// Seeds the jar with `name=value` pairs saved by [`Self::export_cookies`].
    /// They are scoped to the whole API host.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the API base does not resolve.
    pub fn import_cookies(&self, pairs: &[String]) -> Result<(), AppError> {
        let url = self.config.endpoint("/")?;
        for pair in pairs.iter().map(|pair| pair.trim()).filter(|pair| pair.contains('=')) {
            self.jar.add_cookie_str(&format!("{pair}; Path=/"), &url);
        }
        Ok(())
    }

    /// Posts a JSON body and parses a JSON response.
    ///
    /// # Errors
    /// Returns an `AppError` for encode, transport, HTTP status or decode failures.
    pub async fn post_json<B: Serialize, T: DeserializeOwned + Default>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let url = self.config.endpoint(path)?;
        let payload = serde_json::to_vec(body)
            .map_err(|err| AppError::Serialization(format!("Failed to encode request: {err}")))?;
        let request = self
            .http
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(payload);

        let response = send(request, "POST", url.as_str()).await?;
        handle_json_response(response).await
    }

    /// Posts an empty body and parses a JSON response.
    ///
    /// # Errors
    /// Returns an `AppError` for transport, HTTP status or decode failures.
    pub async fn post_empty_json<T: DeserializeOwned + Default>(
        &self,
        path: &str,
    ) -> Result<T, AppError> {
        let url = self.config.endpoint(path)?;
        let request = self.http.post(url.clone());

        let response = send(request, "POST", url.as_str()).await?;
        handle_json_response(response).await
    }

    /// Posts an empty body and ignores whatever the server answers on success.
    ///
    /// # Errors
    /// Returns an `AppError` for transport or HTTP status failures.
    pub async fn post_empty(&self, path: &str) -> Result<(), AppError> {
        let url = self.config.endpoint(path)?;
        let request = self.http.post(url.clone());

        let response = send(request, "POST", url.as_str()).await?;
        handle_empty_response(response).await
    }

    /// Fetches JSON with an `Authorization: Bearer` header.
    ///
    /// # Errors
    /// Returns an `AppError` for transport, HTTP status or decode failures.
    pub async fn get_json_with_bearer<T: DeserializeOwned + Default>(
        &self,
        path: &str,
        token: &SecretString,
    ) -> Result<T, AppError> {
        let url = self.config.endpoint(path)?;
        let request = self
            .http
            .get(url.clone())
            .header(AUTHORIZATION, format!("Bearer {}", token.expose_secret()));

        let response = send(request, "GET", url.as_str()).await?;
        handle_json_response(response).await
    }
}

/// Maps transport errors into `AppError` variants with timeout detection.
fn map_request_error(err: &reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        AppError::Network(format!("Unable to reach the server: {err}"))
    }
}

async fn send(request: RequestBuilder, method: &str, url: &str) -> Result<Response, AppError> {
    let span = info_span!("auth.request", http.method = method, url = %url);
    let response = request
        .send()
        .instrument(span)
        .await
        .map_err(|err| map_request_error(&err))?;

    debug!(status = response.status().as_u16(), "{method} {url}");

    Ok(response)
}

/// Parses JSON responses and surfaces HTTP errors with the server's message.
/// A 2xx body that is empty or not a JSON object decodes to `T::default()`.
async fn handle_json_response<T: DeserializeOwned + Default>(
    response: Response,
) -> Result<T, AppError> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }

    let body = response
        .bytes()
        .await
        .map_err(|err| map_request_error(&err))?;

    decode_success_body(&body)
}

fn decode_success_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, AppError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(value @ Value::Object(_)) => serde_json::from_value(value)
            .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}"))),
        _ => Ok(T::default()),
    }
}

/// Name part of a `name=value` cookie pair.
fn cookie_name(pair: &str) -> &str {
    pair.split_once('=').map_or(pair, |(name, _)| name).trim()
}

async fn handle_empty_response(response: Response) -> Result<(), AppError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(error_from_response(response).await)
    }
}

async fn error_from_response(response: Response) -> AppError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    AppError::Http {
        status,
        message: extract_message(&body),
    }
}

/// Pulls `message` out of a JSON error body, trimmed and truncated.
fn extract_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let message = parsed.message?;
    let trimmed = message.trim();

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(MAX_ERROR_CHARS).collect())
    }
}
