/*
[INPUT]:  Email entered on the forgot-password form
[OUTPUT]: A password-reset OTP requested, then navigation to the verify step
[POS]:    Flow layer - forgot-password request step
[UPDATE]: When the request-reset contract changes
*/

use std::sync::Arc;

use tracing::{debug, warn};

use crate::http::AuthApiClient;
use crate::nav::Route;
use crate::types::ForgotPasswordRequest;

const FORGOT_FAILED_MESSAGE: &str = "Failed to send the reset code. Please try again.";

/// Forgot-password request lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum ForgotPasswordState {
    Idle,
    Submitting,
    /// Code sent; the UI moves on to OTP verification.
    Sent,
    Failed { email: Option<String>, message: String },
}

/// First step of the password-reset flow: request an OTP for an email.
#[derive(Debug)]
pub struct ForgotPasswordFlow {
    client: Arc<AuthApiClient>,
    state: ForgotPasswordState,
}

impl ForgotPasswordFlow {
    pub fn new(client: Arc<AuthApiClient>) -> Self {
        Self {
            client,
            state: ForgotPasswordState::Idle,
        }
    }

    pub fn state(&self) -> &ForgotPasswordState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, ForgotPasswordState::Submitting)
    }

    /// Request a reset code. Duplicate submits are ignored.
    pub async fn submit(&mut self, email: &str) -> &ForgotPasswordState {
        if self.is_busy() {
            debug!("forgot-password request already in flight, ignoring submit");
            return &self.state;
        }
        self.state = ForgotPasswordState::Submitting;

        let request = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.state = match self.client.request_password_reset(&request).await {
            Ok(envelope) if envelope.success => {
                self.client.navigator().push(Route::ForgotPasswordVerify);
                ForgotPasswordState::Sent
            }
            Ok(envelope) => ForgotPasswordState::Failed {
                email: envelope.first_error("email").map(str::to_string),
                message: envelope.failure_message(FORGOT_FAILED_MESSAGE),
            },
            Err(e) => {
                warn!(error = %e, "forgot-password request failed");
                ForgotPasswordState::Failed {
                    email: None,
                    message: e.user_message().to_string(),
                }
            }
        };
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryTokenStorage, SessionSignalBus, TokenStore};
    use crate::http::ClientConfig;
    use crate::nav::RecordingNavigator;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn sent_code_navigates_to_verify_step() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/forgotpassword/"))
            .and(body_json(serde_json::json!({"email": "a@b.com"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "message": "Code sent"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let navigator = Arc::new(RecordingNavigator::new());
        let client = AuthApiClient::with_config(
            ClientConfig {
                base_url: server.uri(),
                ..ClientConfig::default()
            },
            TokenStore::new(MemoryTokenStorage::new()),
            SessionSignalBus::new(),
            navigator.clone(),
        )
        .unwrap();

        let mut flow = ForgotPasswordFlow::new(Arc::new(client));
        flow.submit("a@b.com").await;

        assert_eq!(*flow.state(), ForgotPasswordState::Sent);
        assert_eq!(navigator.last(), Some(Route::ForgotPasswordVerify));
    }
}
