//! Sign-up view: form inputs, password strength meter and the submit flow that
//! hands off to email verification.

pub mod form;
pub mod strength;

pub use form::{LOGIN_ROUTE, SignUpForm, SignUpView, SubmitOutcome, VERIFY_EMAIL_ROUTE};
pub use strength::{PasswordStrength, StrengthLevel};
