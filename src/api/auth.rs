use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::ApiClient;

/// Auth failures collapse to one fixed message per call so the screens
/// never leak credential detail. The underlying cause is kept for the
/// log file via [`AuthError::cause`].
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Sign up failed. Please try again.")]
    SignupFailed(Option<String>),

    #[error("Error logging in. Please check your credentials.")]
    LoginFailed(Option<String>),

    #[error("Incorrect 2FA code.")]
    VerifyFailed(Option<String>),
}

impl AuthError {
    pub fn cause(&self) -> Option<&str> {
        match self {
            AuthError::SignupFailed(cause)
            | AuthError::LoginFailed(cause)
            | AuthError::VerifyFailed(cause) => cause.as_deref(),
        }
    }
}

/// Outcome of a successful `/authenticate` call. When `otp_required` is
/// set the session must pass 2FA before the query screen; `qr_code` is a
/// data URL for first-time authenticator enrollment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    pub otp_required: bool,
    #[serde(default)]
    pub qr_code: Option<String>,
}

#[derive(Debug, Serialize)]
struct CredentialsRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    username: &'a str,
    token: &'a str,
}

#[derive(Debug, Deserialize)]
struct SignupResponse {
    success: bool,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    verified: bool,
    #[serde(default)]
    message: Option<String>,
}

impl ApiClient {
    pub async fn signup(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let response = self
            .http
            .post(self.url("/signup"))
            .json(&CredentialsRequest { username, password })
            .send()
            .await
            .map_err(|err| AuthError::SignupFailed(Some(err.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::SignupFailed(Some(format!(
                "signup returned {status}"
            ))));
        }

        let body: SignupResponse = response
            .json()
            .await
            .map_err(|err| AuthError::SignupFailed(Some(err.to_string())))?;

        if body.success {
            Ok(())
        } else {
            Err(AuthError::SignupFailed(None))
        }
    }

    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginOutcome, AuthError> {
        let response = self
            .http
            .post(self.url("/authenticate"))
            .json(&CredentialsRequest { username, password })
            .send()
            .await
            .map_err(|err| AuthError::LoginFailed(Some(err.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::LoginFailed(Some(format!(
                "authenticate returned {status}"
            ))));
        }

        response
            .json()
            .await
            .map_err(|err| AuthError::LoginFailed(Some(err.to_string())))
    }

    /// Check a one-time code. The token is trimmed before sending so a
    /// copy-pasted code with stray whitespace still verifies.
    pub async fn verify(&self, username: &str, token: &str) -> Result<(), AuthError> {
        let response = self
            .http
            .post(self.url("/verify"))
            .json(&VerifyRequest {
                username,
                token: token.trim(),
            })
            .send()
            .await
            .map_err(|err| AuthError::VerifyFailed(Some(err.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::VerifyFailed(Some(format!(
                "verify returned {status}"
            ))));
        }

        let body: VerifyResponse = response
            .json()
            .await
            .map_err(|err| AuthError::VerifyFailed(Some(err.to_string())))?;

        if body.verified {
            Ok(())
        } else {
            Err(AuthError::VerifyFailed(body.message))
        }
    }
}
