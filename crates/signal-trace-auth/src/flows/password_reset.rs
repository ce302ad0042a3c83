/*
[INPUT]:  Email + OTP from the reset link, new password fields
[OUTPUT]: Password reset server-side, then navigation to sign-in (no auto-login)
[POS]:    Flow layer - password reset final step
[UPDATE]: When the reset contract or link parameters change
*/

use std::sync::Arc;

use tracing::{debug, warn};

use crate::http::AuthApiClient;
use crate::nav::Route;
use crate::types::ResetPasswordRequest;

const RESET_FAILED_MESSAGE: &str = "Failed to reset password";
const PASSWORD_REQUIRED_MESSAGE: &str = "Please enter your new password.";
const PASSWORD_MISMATCH_MESSAGE: &str = "Passwords do not match.";

/// Password-reset lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum ResetState {
    Idle,
    Submitting,
    Done,
    Failed(String),
}

/// Final step of the password-reset flow.
///
/// Exists only when both link parameters were present; the flow owns the new
/// password fields and clears them on success. Client-side checks (empty
/// password, mismatch) fail without a network call and keep the fields.
#[derive(Debug)]
pub struct PasswordResetFlow {
    client: Arc<AuthApiClient>,
    email: String,
    otp_code: String,
    password: String,
    password_confirm: String,
    state: ResetState,
}

impl PasswordResetFlow {
    pub(crate) fn new(client: Arc<AuthApiClient>, email: String, otp_code: String) -> Self {
        Self {
            client,
            email,
            otp_code,
            password: String::new(),
            password_confirm: String::new(),
            state: ResetState::Idle,
        }
    }

    /// Build the flow from the reset link's query parameters.
    ///
    /// A link missing either parameter never reaches the network: this
    /// redirects back to the forgot-password entry point and yields no flow.
    pub fn from_link(
        client: Arc<AuthApiClient>,
        email: Option<&str>,
        otp_code: Option<&str>,
    ) -> Option<Self> {
        match (email, otp_code) {
            (Some(email), Some(otp)) if !email.is_empty() && !otp.is_empty() => {
                Some(Self::new(client, email.to_string(), otp.to_string()))
            }
            _ => {
                warn!("password reset link missing email or otp, redirecting");
                client.navigator().push(Route::ForgotPassword);
                None
            }
        }
    }

    pub fn state(&self) -> &ResetState {
        &self.state
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, ResetState::Submitting)
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        self.password = value.into();
    }

    pub fn set_password_confirm(&mut self, value: impl Into<String>) {
        self.password_confirm = value.into();
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn password_confirm(&self) -> &str {
        &self.password_confirm
    }

    /// Submit the new password. Duplicate submits are ignored.
    pub async fn submit(&mut self) -> &ResetState {
        if self.is_busy() {
            debug!("password reset already in flight, ignoring submit");
            return &self.state;
        }

        // Pre-submission checks never reach the network and keep the fields.
        if self.password.is_empty() {
            self.state = ResetState::Failed(PASSWORD_REQUIRED_MESSAGE.to_string());
            return &self.state;
        }
        if self.password != self.password_confirm {
            self.state = ResetState::Failed(PASSWORD_MISMATCH_MESSAGE.to_string());
            return &self.state;
        }
        self.state = ResetState::Submitting;

        let request = ResetPasswordRequest {
            email: self.email.clone(),
            otp_code: self.otp_code.clone(),
            password: self.password.clone(),
            password_confirm: self.password_confirm.clone(),
        };

        self.state = match self.client.reset_password(&request).await {
            Ok(envelope) if envelope.success => {
                self.password.clear();
                self.password_confirm.clear();
                self.client.navigator().push(Route::SignIn);
                ResetState::Done
            }
            Ok(envelope) => ResetState::Failed(envelope.failure_message(RESET_FAILED_MESSAGE)),
            Err(e) => {
                warn!(error = %e, "password reset request failed");
                ResetState::Failed(e.user_message().to_string())
            }
        };
        &self.state
    }
}
