//! Sign-up form state and submit handling. The form owns the four inputs,
//! derives the strength meter from the live password, and reads loading and
//! error flags from the injected [`AuthStore`] when rendering. Submitting calls
//! `register` and tells the caller where to navigate.

use crate::auth::AuthStore;
use crate::signup::strength::{self, PasswordStrength};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use tracing::error;

/// Route shown after a successful sign-up.
pub const VERIFY_EMAIL_ROUTE: &str = "/verify-email";
/// Route linked from the form footer for existing accounts.
pub const LOGIN_ROUTE: &str = "/login";

/// What the caller should do after a submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Registration succeeded; show this route next.
    Navigate(&'static str),
    /// Registration failed; the store's error is shown inline.
    Failed(Option<String>),
    /// A request is already in flight and the submit control is disabled.
    Ignored,
}

#[derive(Debug, Default)]
pub struct SignUpForm {
    first_name: String,
    last_name: String,
    email: String,
    password: SecretString,
}

impl SignUpForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_first_name(&mut self, value: impl Into<String>) {
        self.first_name = value.into();
    }

    pub fn set_last_name(&mut self, value: impl Into<String>) {
        self.last_name = value.into();
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email = value.into();
    }

    pub fn set_password(&mut self, value: SecretString) {
        self.password = value;
    }

    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Strength of the password as currently typed.
    #[must_use]
    pub fn strength(&self) -> PasswordStrength {
        strength::evaluate(self.password.expose_secret())
    }

    /// Snapshot of everything the form renders.
    #[must_use]
    pub fn view(&self, store: &AuthStore) -> SignUpView {
        let state = store.snapshot();
        SignUpView {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            strength: self.strength(),
            error: state.error,
            submit_disabled: state.is_loading,
        }
    }

    /// Registers the account with the current inputs.
    ///
    /// Does nothing while the store is already loading, matching the disabled
    /// submit control.
    pub async fn submit(&self, store: &AuthStore) -> SubmitOutcome {
        if store.is_loading() {
            return SubmitOutcome::Ignored;
        }

        let result = store
            .register(&self.first_name, &self.last_name, &self.email, &self.password)
            .await;

        if result.success {
            SubmitOutcome::Navigate(VERIFY_EMAIL_ROUTE)
        } else {
            error!(
                "Error signing up: {}",
                result.message.as_deref().unwrap_or("no server message")
            );
            SubmitOutcome::Failed(result.message)
        }
    }
}

/// Render model for the sign-up form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignUpView {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub strength: PasswordStrength,
    pub error: Option<String>,
    pub submit_disabled: bool,
}

impl SignUpView {
    #[must_use]
    pub fn submit_label(&self) -> &'static str {
        if self.submit_disabled {
            "Signing up..."
        } else {
            "Sign Up"
        }
    }
}

impl fmt::Display for SignUpView {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(formatter, "Create Account")?;
        writeln!(formatter, "  First Name: {}", self.first_name)?;
        writeln!(formatter, "  Last Name:  {}", self.last_name)?;
        writeln!(formatter, "  Email:      {}", self.email)?;
        writeln!(formatter, "  Password:   ********")?;
        if let Some(error) = &self.error {
            writeln!(formatter, "  ! {error}")?;
        }
        write!(formatter, "{}", self.strength)?;
        writeln!(formatter, "[ {} ]", self.submit_label())?;
        write!(formatter, "Already have an account? Login at {LOGIN_ROUTE}")
    }
}
