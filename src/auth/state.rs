//! Auth session store. One instance is created per front end and handed to the
//! views that need it; there is no global. Each operation performs a single
//! request through [`client`], merges the result into [`SessionState`], and
//! hands the caller an [`ActionResult`] to branch on. Failures never escape as
//! errors: they become state plus a result.
//!
//! Flow Overview: `login` stores the returned token, then runs `check_auth`,
//! which refreshes the access token before asking the server who is logged in.
//! `verify_email` reuses the email of the user stored by `register`.

use crate::{
    app::{ApiClient, AppError},
    auth::{
        client,
        types::{
            ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, User,
            VerifyCodeRequest,
        },
    },
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, error, info, warn};

const REGISTER_FAILED: &str = "Error signing up";
const LOGIN_FAILED: &str = "Login failed";
const LOGOUT_ERROR: &str = "Logout error";
const LOGOUT_FAILED: &str = "Failed to logout";
const VERIFY_FAILED: &str = "Verification failed";
const EMAIL_NOT_IN_STATE: &str = "Email not found in state";
const FORGOT_PASSWORD_FAILED: &str = "Failed to send reset link";
const RESET_PASSWORD_FAILED: &str = "Failed to reset password";

/// Client-side session state. Only [`AuthStore`] writes it.
#[derive(Clone, Debug)]
pub struct SessionState {
    pub user: Option<User>,
    pub access_token: Option<SecretString>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub is_checking_auth: bool,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl SessionState {
    /// Fresh state: nothing known yet and an auth check pending.
    #[must_use]
    pub fn new() -> Self {
        Self {
            user: None,
            access_token: None,
            is_authenticated: false,
            is_loading: false,
            is_checking_auth: true,
            error: None,
            message: None,
        }
    }

    fn clear_session(&mut self) {
        self.user = None;
        self.access_token = None;
        self.is_authenticated = false;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Uniform outcome of a store operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionResult {
    pub success: bool,
    pub message: Option<String>,
}

impl ActionResult {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    #[must_use]
    pub fn ok_with(message: Option<String>) -> Self {
        Self {
            success: true,
            message,
        }
    }

    #[must_use]
    pub fn failed(message: Option<String>) -> Self {
        Self {
            success: false,
            message,
        }
    }
}

/// Session store bound to one API client.
#[derive(Debug)]
pub struct AuthStore {
    api: ApiClient,
    state: RwLock<SessionState>,
}

impl AuthStore {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: RwLock::new(SessionState::new()),
        }
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Copy of the current state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.read(SessionState::clone)
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.read(|state| state.user.clone())
    }

    #[must_use]
    pub fn access_token(&self) -> Option<SecretString> {
        self.read(|state| state.access_token.clone())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read(|state| state.is_authenticated)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.read(|state| state.is_loading)
    }

    #[must_use]
    pub fn is_checking_auth(&self) -> bool {
        self.read(|state| state.is_checking_auth)
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.read(|state| state.error.clone())
    }

    #[must_use]
    pub fn message(&self) -> Option<String> {
        self.read(|state| state.message.clone())
    }

    /// Creates an account and stores the returned user.
    pub async fn register(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &SecretString,
    ) -> ActionResult {
        self.begin();

        let request = RegisterRequest {
            first_name,
            last_name,
            email,
            password: password.expose_secret(),
        };

        match client::register(&self.api, &request).await {
            Ok(response) => {
                info!("registration succeeded");
                self.update(|state| {
                    state.is_loading = false;
                    state.user = response.user;
                });
                ActionResult::ok()
            }
            Err(err) => self.fail(&err, REGISTER_FAILED),
        }
    }

    /// Logs in, stores the session, then confirms it with [`Self::check_auth`].
    pub async fn login(&self, email: &str, password: &SecretString) -> ActionResult {
        self.begin();

        let request = LoginRequest {
            email,
            password: password.expose_secret(),
        };

        match client::login(&self.api, &request).await {
            Ok(response) => {
                self.update(|state| {
                    state.is_loading = false;
                    state.user = response.user;
                    state.access_token = response.access_token.map(SecretString::from);
                    state.is_authenticated = true;
                });

                self.check_auth().await;

                ActionResult::ok()
            }
            Err(err) => self.fail(&err, LOGIN_FAILED),
        }
    }

    /// Ends the session on the server and forgets it locally.
    ///
    /// A failed logout leaves the local session untouched.
    pub async fn logout(&self) -> ActionResult {
        self.begin();

        match client::logout(&self.api).await {
            Ok(()) => {
                self.update(|state| {
                    state.is_loading = false;
                    state.clear_session();
                });
                ActionResult::ok()
            }
            Err(err) => {
                self.fail(&err, LOGOUT_ERROR);
                ActionResult::failed(Some(LOGOUT_FAILED.to_string()))
            }
        }
    }

    /// Submits a verification code for the email of the stored user.
    pub async fn verify_email(&self, code: &str) -> ActionResult {
        self.begin();

        let Some(email) = self.read(|state| {
            state
                .user
                .as_ref()
                .and_then(User::email)
                .map(ToString::to_string)
        }) else {
            let err = AppError::Validation(EMAIL_NOT_IN_STATE.to_string());
            warn!(kind = ?err.kind(), "verification requested without a stored email");
            self.update(|state| state.is_loading = false);
            return ActionResult::failed(Some(err.to_string()));
        };

        let request = VerifyCodeRequest {
            email: &email,
            code,
        };

        match client::verify_code(&self.api, &request).await {
            Ok(response) => {
                self.update(|state| {
                    state.is_loading = false;
                    state.user = response.user;
                });
                ActionResult::ok()
            }
            Err(err) => self.fail(&err, VERIFY_FAILED),
        }
    }

    /// Refreshes the access token, then asks the server who is logged in.
    /// Any failure, including a missing token, leaves the store logged out;
    /// the error is logged and not stored.
    pub async fn check_auth(&self) {
        self.update(|state| {
            state.is_checking_auth = true;
            state.error = None;
        });

        debug!("checking authentication");

        self.refresh_access_token().await;

        let Some(token) = self.access_token() else {
            debug!("no access token, session is anonymous");
            self.update(|state| {
                state.user = None;
                state.is_authenticated = false;
                state.is_checking_auth = false;
            });
            return;
        };

        match client::check_auth(&self.api, &token).await {
            Ok(response) => {
                debug!("authentication confirmed");
                self.update(|state| {
                    state.user = response.user;
                    state.is_authenticated = true;
                    state.is_checking_auth = false;
                });
            }
            Err(err) => {
                self.update(|state| {
                    state.user = None;
                    state.is_authenticated = false;
                    state.is_checking_auth = false;
                });
                error!("auth check failed: {err}");
            }
        }
    }

    /// Trades the refresh cookie for a new access token and stores it.
    /// Returns `None` on failure without touching the stored token.
    pub async fn refresh_access_token(&self) -> Option<SecretString> {
        match client::refresh_token(&self.api).await {
            Ok(response) => {
                let token = response.access_token.map(SecretString::from);
                self.update(|state| state.access_token.clone_from(&token));
                token
            }
            Err(err) => {
                error!("failed to refresh token: {err}");
                None
            }
        }
    }

    /// Requests a password reset email.
    pub async fn forgot_password(&self, email: &str) -> ActionResult {
        self.begin();

        let request = ForgotPasswordRequest { email };

        match client::forgot_password(&self.api, &request).await {
            Ok(response) => {
                self.update(|state| {
                    state.is_loading = false;
                    state.message.clone_from(&response.message);
                });
                ActionResult::ok_with(response.message)
            }
            Err(err) => self.fail(&err, FORGOT_PASSWORD_FAILED),
        }
    }

    /// Sets a new password with the token from a reset link.
    pub async fn reset_password(&self, token: &str, password: &SecretString) -> ActionResult {
        self.begin();

        let request = ResetPasswordRequest {
            password: password.expose_secret(),
        };

        match client::reset_password(&self.api, token, &request).await {
            Ok(response) => {
                self.update(|state| {
                    state.is_loading = false;
                    state.message.clone_from(&response.message);
                });
                ActionResult::ok_with(response.message)
            }
            Err(err) => self.fail(&err, RESET_PASSWORD_FAILED),
        }
    }

    /// Marks a loading operation as started.
    fn begin(&self) {
        self.update(|state| {
            state.is_loading = true;
            state.error = None;
            state.message = None;
        });
    }

    /// Records a failed loading operation and builds its result.
    fn fail(&self, err: &AppError, default: &str) -> ActionResult {
        warn!(kind = ?err.kind(), "auth request failed: {err}");
        let message = err.message_or(default);
        self.update(|state| {
            state.is_loading = false;
            state.error = Some(message);
        });
        ActionResult::failed(err.server_message().map(ToString::to_string))
    }

    fn read<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn update(&self, f: impl FnOnce(&mut SessionState)) {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{AppConfig, Mode};
    use anyhow::{Result, anyhow};
    use serde_json::json;
    use std::{net::TcpListener, time::Duration};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn store_for(server: &MockServer) -> Result<AuthStore> {
        let mut config = AppConfig::for_mode(Mode::Development);
        config.api_base_url = format!("{}/api/v1/auth", server.uri());
        Ok(AuthStore::new(ApiClient::new(config)?))
    }

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    fn ada() -> serde_json::Value {
        json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "isVerified": false
        })
    }

    async fn mount_refresh(server: &MockServer, token: &str) {
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/refresh-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accessToken": token
            })))
            .mount(server)
            .await;
    }

    async fn request_count(server: &MockServer) -> Result<usize> {
        server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .ok_or_else(|| anyhow!("wiremock request recording is disabled"))
    }

    #[test]
    fn initial_state_is_checking_auth() {
        let state = SessionState::new();
        assert!(state.user.is_none());
        assert!(state.access_token.is_none());
        assert!(!state.is_authenticated);
        assert!(!state.is_loading);
        assert!(state.is_checking_auth);
        assert!(state.error.is_none());
        assert!(state.message.is_none());
    }

    #[tokio::test]
    async fn register_stores_user() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/register"))
            .and(body_json(json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "password": "Analytical1!"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "user": ada() })))
            .mount(&server)
            .await;

        let store = store_for(&server)?;
        let result = store
            .register("Ada", "Lovelace", "ada@example.com", &secret("Analytical1!"))
            .await;

        assert_eq!(result, ActionResult::ok());
        let state = store.snapshot();
        assert_eq!(
            state.user.as_ref().and_then(User::email),
            Some("ada@example.com")
        );
        assert!(!state.is_loading);
        assert!(state.error.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn register_failure_records_server_message() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/register"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "message": "Email in use"
            })))
            .mount(&server)
            .await;

        let store = store_for(&server)?;
        let result = store
            .register("Ada", "Lovelace", "ada@example.com", &secret("pw"))
            .await;

        assert!(!result.success);
        assert_eq!(result.message.as_deref(), Some("Email in use"));
        assert_eq!(store.error().as_deref(), Some("Email in use"));
        assert!(!store.is_loading());
        Ok(())
    }

    #[tokio::test]
    async fn register_failure_without_message_uses_default() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/register"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let store = store_for(&server)?;
        let result = store
            .register("Ada", "Lovelace", "ada@example.com", &secret("pw"))
            .await;

        assert_eq!(result, ActionResult::failed(None));
        assert_eq!(store.error().as_deref(), Some("Error signing up"));
        Ok(())
    }

    async fn loading_midway<F>(store: &AuthStore, operation: F) -> (ActionResult, bool)
    where
        F: std::future::Future<Output = ActionResult>,
    {
        tokio::join!(operation, async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            store.is_loading()
        })
    }

    async fn mount_delayed(server: &MockServer, route: &str, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(format!("/api/v1/auth{route}")))
            .respond_with(response.set_delay(Duration::from_millis(300)))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn is_loading_spans_each_request() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        mount_delayed(
            &server,
            "/register",
            ResponseTemplate::new(201).set_body_json(json!({ "user": ada() })),
        )
        .await;
        mount_delayed(
            &server,
            "/login",
            ResponseTemplate::new(200).set_body_json(json!({
                "user": ada(),
                "accessToken": "login-token"
            })),
        )
        .await;
        mount_delayed(&server, "/forgot-password", ResponseTemplate::new(200)).await;
        mount_delayed(
            &server,
            "/reset-password/tok-1",
            ResponseTemplate::new(500),
        )
        .await;
        mount_delayed(&server, "/logout", ResponseTemplate::new(200)).await;
        mount_refresh(&server, "fresh-token").await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/check-auth"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": ada() })))
            .mount(&server)
            .await;

        let store = store_for(&server)?;
        assert!(!store.is_loading());

        let password = secret("Analytical1!");

        let (result, midway) = loading_midway(
            &store,
            store.register("Ada", "Lovelace", "ada@example.com", &password),
        )
        .await;
        assert!(midway, "register");
        assert!(result.success);
        assert!(!store.is_loading());

        let (result, midway) =
            loading_midway(&store, store.login("ada@example.com", &password)).await;
        assert!(midway, "login");
        assert!(result.success);
        assert!(!store.is_loading());

        let (result, midway) =
            loading_midway(&store, store.forgot_password("ada@example.com")).await;
        assert!(midway, "forgot_password");
        assert_eq!(result, ActionResult::ok_with(None));
        assert!(!store.is_loading());

        let (result, midway) =
            loading_midway(&store, store.reset_password("tok-1", &password)).await;
        assert!(midway, "reset_password");
        assert_eq!(result, ActionResult::failed(None));
        assert_eq!(store.error().as_deref(), Some("Failed to reset password"));
        assert!(!store.is_loading());

        let (result, midway) = loading_midway(&store, store.logout()).await;
        assert!(midway, "logout");
        assert!(result.success);
        assert!(store.error().is_none());
        assert!(!store.is_loading());
        Ok(())
    }

    #[tokio::test]
    async fn forgot_password_stores_server_message() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/forgot-password"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "message": "Reset link sent" })),
            )
            .mount(&server)
            .await;

        let store = store_for(&server)?;
        let result = store.forgot_password("ada@example.com").await;

        assert_eq!(
            result,
            ActionResult::ok_with(Some("Reset link sent".to_string()))
        );
        assert_eq!(store.message().as_deref(), Some("Reset link sent"));
        Ok(())
    }

    #[tokio::test]
    async fn empty_success_bodies_still_succeed() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        for route in ["/register", "/forgot-password", "/reset-password/tok-1"] {
            Mock::given(method("POST"))
                .and(path(format!("/api/v1/auth{route}")))
                .respond_with(ResponseTemplate::new(200))
                .mount(&server)
                .await;
        }
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/refresh-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .mount(&server)
            .await;

        let store = store_for(&server)?;

        let result = store
            .register("Ada", "Lovelace", "ada@example.com", &secret("pw"))
            .await;
        assert_eq!(result, ActionResult::ok());
        assert!(store.user().is_none());

        let result = store.forgot_password("ada@example.com").await;
        assert_eq!(result, ActionResult::ok_with(None));
        assert!(store.error().is_none());

        let result = store.reset_password("tok-1", &secret("N3w-password")).await;
        assert_eq!(result, ActionResult::ok_with(None));
        assert!(store.error().is_none());

        assert!(store.refresh_access_token().await.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn verify_email_without_user_skips_network() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let store = store_for(&server)?;

        let result = store.verify_email("123456").await;

        assert!(!result.success);
        assert_eq!(
            result.message,
            Some(AppError::Validation(EMAIL_NOT_IN_STATE.to_string()).to_string())
        );
        assert_eq!(result.message.as_deref(), Some("Email not found in state"));
        assert!(!store.is_loading());
        assert!(store.error().is_none());
        assert_eq!(request_count(&server).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn verify_email_uses_registered_email() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/register"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "user": ada() })))
            .mount(&server)
            .await;

        let mut verified = ada();
        verified["isVerified"] = json!(true);
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/verify-code"))
            .and(body_json(json!({ "email": "ada@example.com", "code": "123456" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": verified })))
            .mount(&server)
            .await;

        let store = store_for(&server)?;
        let registered = store
            .register("Ada", "Lovelace", "ada@example.com", &secret("pw"))
            .await;
        assert!(registered.success);

        let result = store.verify_email("123456").await;
        assert!(result.success);
        assert_eq!(store.user().and_then(|user| user.is_verified()), Some(true));
        Ok(())
    }

    #[tokio::test]
    async fn verify_email_failure_records_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/register"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "user": ada() })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/verify-code"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({})))
            .mount(&server)
            .await;

        let store = store_for(&server)?;
        store
            .register("Ada", "Lovelace", "ada@example.com", &secret("pw"))
            .await;
        let result = store.verify_email("000000").await;

        assert_eq!(result, ActionResult::failed(None));
        assert_eq!(store.error().as_deref(), Some("Verification failed"));
        assert_eq!(
            store.user().as_ref().and_then(User::email),
            Some("ada@example.com")
        );
        Ok(())
    }

    #[tokio::test]
    async fn login_then_check_auth_authenticates() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .and(body_json(json!({ "email": "ada@example.com", "password": "pw" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": ada(),
                "accessToken": "login-token"
            })))
            .mount(&server)
            .await;
        mount_refresh(&server, "fresh-token").await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/check-auth"))
            .and(header("authorization", "Bearer fresh-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": ada() })))
            .mount(&server)
            .await;

        let store = store_for(&server)?;
        let result = store.login("ada@example.com", &secret("pw")).await;

        assert_eq!(result, ActionResult::ok());
        let state = store.snapshot();
        assert!(state.is_authenticated);
        assert!(!state.is_checking_auth);
        assert!(!state.is_loading);
        assert_eq!(
            state.access_token.as_ref().map(ExposeSecret::expose_secret),
            Some("fresh-token")
        );
        assert_eq!(
            state.user.as_ref().and_then(User::first_name),
            Some("Ada")
        );
        Ok(())
    }

    #[tokio::test]
    async fn login_keeps_login_token_when_refresh_fails() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": ada(),
                "accessToken": "login-token"
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/refresh-token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "No refresh token"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/check-auth"))
            .and(header("authorization", "Bearer login-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": ada() })))
            .mount(&server)
            .await;

        let store = store_for(&server)?;
        let result = store.login("ada@example.com", &secret("pw")).await;

        assert!(result.success);
        assert!(store.is_authenticated());
        assert!(store.error().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn failing_check_auth_after_login_clears_session() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": ada(),
                "accessToken": "login-token"
            })))
            .mount(&server)
            .await;
        mount_refresh(&server, "fresh-token").await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/check-auth"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "Unauthorized"
            })))
            .mount(&server)
            .await;

        let store = store_for(&server)?;
        let result = store.login("ada@example.com", &secret("pw")).await;

        assert!(result.success);
        let state = store.snapshot();
        assert!(!state.is_authenticated);
        assert!(state.user.is_none());
        assert!(!state.is_checking_auth);
        assert!(state.error.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn login_failure_uses_default_message() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let store = store_for(&server)?;
        let result = store.login("ada@example.com", &secret("pw")).await;

        assert_eq!(result, ActionResult::failed(None));
        assert_eq!(store.error().as_deref(), Some("Login failed"));
        assert!(!store.is_authenticated());
        assert!(!store.is_loading());
        Ok(())
    }

    #[tokio::test]
    async fn check_auth_without_token_skips_check() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/refresh-token"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/check-auth"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": ada() })))
            .expect(0)
            .mount(&server)
            .await;

        let store = store_for(&server)?;
        assert!(store.is_checking_auth());

        store.check_auth().await;

        let state = store.snapshot();
        assert!(!state.is_checking_auth);
        assert!(!state.is_authenticated);
        assert!(state.user.is_none());
        assert!(state.error.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn refresh_access_token_returns_and_stores_token() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        mount_refresh(&server, "fresh-token").await;

        let store = store_for(&server)?;
        let token = store.refresh_access_token().await;

        assert_eq!(
            token.as_ref().map(ExposeSecret::expose_secret),
            Some("fresh-token")
        );
        assert_eq!(
            store
                .access_token()
                .as_ref()
                .map(ExposeSecret::expose_secret),
            Some("fresh-token")
        );
        assert!(!store.is_loading());
        Ok(())
    }

    #[tokio::test]
    async fn logout_clears_session() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": ada(),
                "accessToken": "login-token"
            })))
            .mount(&server)
            .await;
        mount_refresh(&server, "fresh-token").await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/check-auth"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": ada() })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/logout"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Logged out successfully"
            })))
            .mount(&server)
            .await;

        let store = store_for(&server)?;
        store.login("ada@example.com", &secret("pw")).await;
        assert!(store.is_authenticated());

        let result = store.logout().await;

        assert_eq!(result, ActionResult::ok());
        let state = store.snapshot();
        assert!(state.user.is_none());
        assert!(state.access_token.is_none());
        assert!(!state.is_authenticated);
        assert!(!state.is_loading);
        Ok(())
    }

    #[tokio::test]
    async fn logout_from_empty_state_succeeds() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/logout"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let store = store_for(&server)?;
        let result = store.logout().await;

        assert!(result.success);
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn failed_logout_keeps_session() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": ada(),
                "accessToken": "login-token"
            })))
            .mount(&server)
            .await;
        mount_refresh(&server, "fresh-token").await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/check-auth"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": ada() })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/logout"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let store = store_for(&server)?;
        store.login("ada@example.com", &secret("pw")).await;

        let result = store.logout().await;

        assert_eq!(
            result,
            ActionResult::failed(Some("Failed to logout".to_string()))
        );
        assert_eq!(store.error().as_deref(), Some("Logout error"));
        assert!(store.is_authenticated());
        assert!(store.access_token().is_some());
        Ok(())
    }

    #[tokio::test]
    async fn forgot_password_failure_records_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/forgot-password"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "User not found"
            })))
            .mount(&server)
            .await;

        let store = store_for(&server)?;
        let result = store.forgot_password("nobody@example.com").await;

        assert_eq!(
            result,
            ActionResult::failed(Some("User not found".to_string()))
        );
        assert_eq!(store.error().as_deref(), Some("User not found"));
        assert!(store.message().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn reset_password_posts_to_token_path() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/reset-password/3f9c0a7b"))
            .and(body_json(json!({ "password": "N3w-password" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Password reset successful"
            })))
            .mount(&server)
            .await;

        let store = store_for(&server)?;
        let result = store
            .reset_password("3f9c0a7b", &secret("N3w-password"))
            .await;

        assert_eq!(
            result,
            ActionResult::ok_with(Some("Password reset successful".to_string()))
        );
        assert!(!store.is_loading());
        Ok(())
    }

    #[tokio::test]
    async fn reset_password_failure_uses_default_message() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/reset-password/expired"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let store = store_for(&server)?;
        let result = store.reset_password("expired", &secret("pw")).await;

        assert!(!result.success);
        assert_eq!(store.error().as_deref(), Some("Failed to reset password"));
        Ok(())
    }
}
