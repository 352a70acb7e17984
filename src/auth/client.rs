//! Client wrappers for the auth API endpoints. These helpers centralize paths
//! and payload shapes, keeping the session store free of request plumbing and
//! preventing token leakage in view code.

use crate::{
    app::{ApiClient, AppError},
    auth::types::{
        ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
        ResetPasswordRequest, TokenResponse, UserResponse, VerifyCodeRequest,
    },
};
use secrecy::SecretString;
use url::form_urlencoded;

/// Endpoints that read the refresh cookie; a saved session keeps what the jar
/// would send to them.
pub const SESSION_COOKIE_PATHS: &[&str] = &["/refresh-token", "/logout", "/check-auth"];

/// Creates an account and returns the stored user.
/// Must never log the request, it carries the password.
pub async fn register(
    api: &ApiClient,
    request: &RegisterRequest<'_>,
) -> Result<UserResponse, AppError> {
    api.post_json("/register", request).await
}

/// Logs in; the server sets the refresh cookie and returns an access token.
pub async fn login(api: &ApiClient, request: &LoginRequest<'_>) -> Result<LoginResponse, AppError> {
    api.post_json("/login", request).await
}

/// Clears the session on the server.
pub async fn logout(api: &ApiClient) -> Result<(), AppError> {
    api.post_empty("/logout").await
}

/// Submits the emailed verification code for the given address.
pub async fn verify_code(
    api: &ApiClient,
    request: &VerifyCodeRequest<'_>,
) -> Result<UserResponse, AppError> {
    api.post_json("/verify-code", request).await
}

/// Returns the current user for a valid access token.
pub async fn check_auth(api: &ApiClient, token: &SecretString) -> Result<UserResponse, AppError> {
    api.get_json_with_bearer("/check-auth", token).await
}

/// Trades the refresh cookie for a new access token.
pub async fn refresh_token(api: &ApiClient) -> Result<TokenResponse, AppError> {
    api.post_empty_json("/refresh-token").await
}

/// Requests a password reset link. The server answers the same way whether or
/// not the address exists.
pub async fn forgot_password(
    api: &ApiClient,
    request: &ForgotPasswordRequest<'_>,
) -> Result<MessageResponse, AppError> {
    api.post_json("/forgot-password", request).await
}

/// Sets a new password using the token from the reset link.
pub async fn reset_password(
    api: &ApiClient,
    token: &str,
    request: &ResetPasswordRequest<'_>,
) -> Result<MessageResponse, AppError> {
    let path = format!("/reset-password/{}", encode_path_segment(token));
    api.post_json(&path, request).await
}

/// Percent-encodes a single path segment.
fn encode_path_segment(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::encode_path_segment;

    #[test]
    fn path_segment_encoding_keeps_plain_tokens() {
        assert_eq!(encode_path_segment("3f9c0a7b"), "3f9c0a7b");
    }

    #[test]
    fn path_segment_encoding_escapes_separators() {
        assert_eq!(encode_path_segment("a/b c+d"), "a%2Fb%20c%2Bd");
    }
}
