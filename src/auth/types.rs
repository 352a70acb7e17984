//! Request and response types for the auth API. Request payloads carry
//! passwords and verification codes, so they borrow their fields and do not
//! implement `Debug`; they must never be logged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// User record as returned by the backend. The client keeps it verbatim and
/// only reads a few well-known fields for display.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct User(Map<String, Value>);

impl User {
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.str_field("email")
    }

    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        self.str_field("firstName")
    }

    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.str_field("lastName")
    }

    #[must_use]
    pub fn is_verified(&self) -> Option<bool> {
        self.0.get("isVerified").and_then(Value::as_bool)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub struct VerifyCodeRequest<'a> {
    pub email: &'a str,
    pub code: &'a str,
}

#[derive(Serialize)]
pub struct ForgotPasswordRequest<'a> {
    pub email: &'a str,
}

#[derive(Serialize)]
pub struct ResetPasswordRequest<'a> {
    pub password: &'a str,
}

/// Body of register, verify-code and check-auth responses.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UserResponse {
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Body of forgot-password and reset-password responses.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}
