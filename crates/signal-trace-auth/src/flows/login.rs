/*
[INPUT]:  Email/password entered on the sign-in form
[OUTPUT]: Stored session + profile navigation, or field-keyed errors
[POS]:    Flow layer - sign-in state machine
[UPDATE]: When the login contract or error surface changes
*/

use std::sync::Arc;

use tracing::{debug, warn};

use crate::http::{ApiEnvelope, AuthApiClient};
use crate::nav::Route;
use crate::types::LoginRequest;

use super::store_session;

const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please check your credentials.";

/// Field-keyed errors from a failed login, preserving the server's keys so
/// the form can highlight fields without discarding entered values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginErrors {
    pub email: Option<String>,
    pub password: Option<String>,
    pub non_field: Option<String>,
    /// General user-displayable message.
    pub message: String,
}

impl LoginErrors {
    fn from_envelope<T>(envelope: &ApiEnvelope<T>) -> Self {
        Self {
            email: envelope.first_error("email").map(str::to_string),
            password: envelope.first_error("password").map(str::to_string),
            non_field: envelope.first_error("non_field_errors").map(str::to_string),
            message: envelope.failure_message(LOGIN_FAILED_MESSAGE),
        }
    }

    fn message_only(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

/// Sign-in lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginState {
    Idle,
    Submitting,
    Authenticated,
    Failed(LoginErrors),
}

/// Sign-in flow: one submission in flight at a time; success stores the
/// token pair, broadcasts the session signal, and navigates to the profile.
#[derive(Debug)]
pub struct LoginFlow {
    client: Arc<AuthApiClient>,
    state: LoginState,
}

impl LoginFlow {
    pub fn new(client: Arc<AuthApiClient>) -> Self {
        Self {
            client,
            state: LoginState::Idle,
        }
    }

    pub fn state(&self) -> &LoginState {
        &self.state
    }

    /// Whether a submission is in flight (the UI disables its button on this).
    pub fn is_busy(&self) -> bool {
        matches!(self.state, LoginState::Submitting)
    }

    /// Submit credentials. A duplicate submit while one is in flight is ignored.
    pub async fn submit(&mut self, email: &str, password: &str) -> &LoginState {
        if self.is_busy() {
            debug!("login already in flight, ignoring submit");
            return &self.state;
        }
        self.state = LoginState::Submitting;

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        self.state = match self.client.login(&request).await {
            Ok(envelope) if envelope.success => match envelope.data {
                Some(data) => {
                    store_session(&self.client, data.tokens);
                    self.client.navigator().push(Route::Profile);
                    LoginState::Authenticated
                }
                None => LoginState::Failed(LoginErrors::message_only(LOGIN_FAILED_MESSAGE)),
            },
            Ok(envelope) => LoginState::Failed(LoginErrors::from_envelope(&envelope)),
            Err(e) => {
                warn!(error = %e, "login request failed");
                LoginState::Failed(LoginErrors::message_only(e.user_message()))
            }
        };
        &self.state
    }
}
