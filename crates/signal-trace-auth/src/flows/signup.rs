/*
[INPUT]:  Registration form fields
[OUTPUT]: Immediate session, or a pending-verification handoff to the OTP flow
[POS]:    Flow layer - sign-up state machine
[UPDATE]: When the signup contract or verification handoff changes
*/

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::http::AuthApiClient;
use crate::nav::Route;
use crate::types::SignupRequest;

use super::otp::OtpFlow;
use super::store_session;

const SIGNUP_FAILED_MESSAGE: &str = "Registration failed. Please check your information.";

/// Signup fields carried into the OTP step, in case verification has to
/// resubmit the full registration data. Discarded when the flow is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSignup {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

impl From<SignupRequest> for PendingSignup {
    fn from(form: SignupRequest) -> Self {
        Self {
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            password: form.password,
            password_confirm: form.password_confirm,
        }
    }
}

/// Field-keyed errors from a failed signup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupErrors {
    pub fields: HashMap<String, String>,
    pub message: String,
}

/// Sign-up lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SignupState {
    Idle,
    Submitting,
    /// Server logged the account in immediately.
    Authenticated,
    /// Account created, awaiting OTP verification.
    AwaitingVerification,
    Failed(SignupErrors),
}

/// Sign-up flow. When the server returns tokens the signup is an immediate
/// login; otherwise the flow hands off to [`OtpFlow`] with the entered
/// fields as pending context.
#[derive(Debug)]
pub struct SignupFlow {
    client: Arc<AuthApiClient>,
    state: SignupState,
    pending: Option<PendingSignup>,
}

impl SignupFlow {
    pub fn new(client: Arc<AuthApiClient>) -> Self {
        Self {
            client,
            state: SignupState::Idle,
            pending: None,
        }
    }

    pub fn state(&self) -> &SignupState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, SignupState::Submitting)
    }

    /// Pending context while awaiting verification.
    pub fn pending(&self) -> Option<&PendingSignup> {
        self.pending.as_ref()
    }

    /// Submit the registration form. Duplicate submits are ignored.
    pub async fn submit(&mut self, form: SignupRequest) -> &SignupState {
        if self.is_busy() {
            debug!("signup already in flight, ignoring submit");
            return &self.state;
        }
        self.state = SignupState::Submitting;

        self.state = match self.client.signup(&form).await {
            Ok(envelope) if envelope.success => {
                match envelope.data.and_then(|d| d.tokens) {
                    Some(tokens) => {
                        store_session(&self.client, tokens);
                        self.client.navigator().push(Route::Profile);
                        SignupState::Authenticated
                    }
                    None => {
                        self.pending = Some(PendingSignup::from(form));
                        self.client.navigator().push(Route::SignupVerify);
                        SignupState::AwaitingVerification
                    }
                }
            }
            Ok(envelope) => SignupState::Failed(SignupErrors {
                fields: envelope
                    .errors
                    .as_ref()
                    .map(|e| e.flatten())
                    .unwrap_or_default(),
                message: envelope.failure_message(SIGNUP_FAILED_MESSAGE),
            }),
            Err(e) => {
                warn!(error = %e, "signup request failed");
                SignupState::Failed(SignupErrors {
                    fields: HashMap::new(),
                    message: e.user_message().to_string(),
                })
            }
        };
        &self.state
    }

    /// Convert into the OTP verification step, consuming the pending context.
    ///
    /// Yields `None` unless the flow reached `AwaitingVerification`.
    pub fn into_verification(self) -> Option<OtpFlow> {
        match (self.state, self.pending) {
            (SignupState::AwaitingVerification, Some(pending)) => {
                Some(OtpFlow::for_signup(self.client, pending))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryTokenStorage, SessionSignalBus, TokenStore};
    use crate::http::ClientConfig;
    use crate::nav::RecordingNavigator;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn form() -> SignupRequest {
        SignupRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "s3cret!pw".to_string(),
            password_confirm: "s3cret!pw".to_string(),
        }
    }

    async fn flow_against(server: &MockServer) -> (SignupFlow, TokenStore, Arc<RecordingNavigator>) {
        let store = TokenStore::new(MemoryTokenStorage::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let client = AuthApiClient::with_config(
            ClientConfig {
                base_url: server.uri(),
                ..ClientConfig::default()
            },
            store.clone(),
            SessionSignalBus::new(),
            navigator.clone(),
        )
        .unwrap();
        (SignupFlow::new(Arc::new(client)), store, navigator)
    }

    #[tokio::test]
    async fn signup_with_tokens_is_an_immediate_login() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/signup/"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "success": true,
                "message": "Successfully registered",
                "data": {"tokens": {"access": "acc", "refresh": "ref"}}
            })))
            .mount(&server)
            .await;

        let (mut flow, store, navigator) = flow_against(&server).await;
        flow.submit(form()).await;

        assert_eq!(*flow.state(), SignupState::Authenticated);
        assert!(store.is_authenticated());
        assert_eq!(navigator.last(), Some(Route::Profile));
        assert!(flow.into_verification().is_none());
    }

    #[tokio::test]
    async fn signup_without_tokens_awaits_verification_with_context() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/signup/"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "success": true,
                "message": "Check your email for the verification code"
            })))
            .mount(&server)
            .await;

        let (mut flow, store, navigator) = flow_against(&server).await;
        flow.submit(form()).await;

        assert_eq!(*flow.state(), SignupState::AwaitingVerification);
        assert!(!store.is_authenticated());
        assert_eq!(navigator.last(), Some(Route::SignupVerify));
        assert_eq!(flow.pending().unwrap().email, "ada@example.com");

        let otp = flow.into_verification().unwrap();
        assert_eq!(otp.email(), "ada@example.com");
    }

    #[tokio::test]
    async fn field_errors_are_flattened_per_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/signup/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "success": false,
                "message": "Registration failed",
                "errors": {
                    "email": ["A user with that email already exists."],
                    "password": {"detail": ["Too short."]}
                }
            })))
            .mount(&server)
            .await;

        let (mut flow, _store, _navigator) = flow_against(&server).await;
        flow.submit(form()).await;

        match flow.state() {
            SignupState::Failed(errors) => {
                assert_eq!(
                    errors.fields.get("email").map(String::as_str),
                    Some("A user with that email already exists.")
                );
                assert_eq!(
                    errors.fields.get("password").map(String::as_str),
                    Some("Too short.")
                );
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }
}
