/*
[INPUT]:  Profile and password-change form fields, current session
[OUTPUT]: Loaded/updated profile data with field-keyed validation errors
[POS]:    Flow layer - authenticated profile maintenance
[UPDATE]: When profile endpoints or the password-change contract change
*/

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::http::AuthApiClient;
use crate::nav::Route;
use crate::types::{AuthUser, PasswordChangeRequest, ProfileUpdateRequest};

const PROFILE_FETCH_FAILED: &str = "Failed to fetch profile";
const PROFILE_UPDATE_FAILED: &str = "Failed to update profile";
const PASSWORD_CHANGE_FAILED: &str = "Failed to change password";

/// Profile page flow: load, edit, and change password, guarded by the
/// session. Token rejection rides the client's centralized 401 interceptor;
/// this flow never clears tokens itself.
#[derive(Debug)]
pub struct ProfileFlow {
    client: Arc<AuthApiClient>,
    user: Option<AuthUser>,
    busy: bool,
    errors: HashMap<String, String>,
    last_error: Option<String>,
    password_form: PasswordChangeRequest,
}

impl ProfileFlow {
    pub fn new(client: Arc<AuthApiClient>) -> Self {
        Self {
            client,
            user: None,
            busy: false,
            errors: HashMap::new(),
            last_error: None,
            password_form: PasswordChangeRequest::default(),
        }
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Field-keyed errors from the last failed update.
    pub fn errors(&self) -> &HashMap<String, String> {
        &self.errors
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn password_form(&self) -> &PasswordChangeRequest {
        &self.password_form
    }

    pub fn password_form_mut(&mut self) -> &mut PasswordChangeRequest {
        &mut self.password_form
    }

    /// Load the profile. Without a local session this goes straight to
    /// sign-in, never to the network.
    pub async fn load(&mut self) -> Option<&AuthUser> {
        if !self.client.token_store().is_authenticated() {
            self.client.navigator().push(Route::SignIn);
            return None;
        }
        if self.busy {
            debug!("profile load already in flight");
            return self.user.as_ref();
        }
        self.busy = true;
        self.last_error = None;

        match self.client.fetch_profile().await {
            Ok(envelope) if envelope.success => {
                self.user = envelope.data.map(|d| d.user);
            }
            Ok(envelope) => {
                self.last_error = Some(envelope.failure_message(PROFILE_FETCH_FAILED));
            }
            Err(e) if e.is_auth_error() => {
                // Interceptor already cleared the session and navigated.
                debug!("profile fetch rejected, session invalidated");
            }
            Err(e) => {
                warn!(error = %e, "profile fetch failed");
                self.last_error = Some(e.user_message().to_string());
            }
        }
        self.busy = false;
        self.user.as_ref()
    }

    /// Update profile fields. Returns whether the update was accepted.
    pub async fn update_profile(&mut self, request: &ProfileUpdateRequest) -> bool {
        if self.busy {
            debug!("profile update already in flight, ignoring submit");
            return false;
        }
        self.busy = true;
        self.errors.clear();
        self.last_error = None;

        let ok = match self.client.update_profile(request).await {
            Ok(envelope) if envelope.success => {
                self.user = envelope.data.map(|d| d.user).or(self.user.take());
                true
            }
            Ok(envelope) => {
                if let Some(errors) = &envelope.errors {
                    self.errors = errors.flatten();
                }
                self.last_error = Some(envelope.failure_message(PROFILE_UPDATE_FAILED));
                false
            }
            Err(e) => {
                if !e.is_auth_error() {
                    warn!(error = %e, "profile update failed");
                    self.last_error = Some(e.user_message().to_string());
                }
                false
            }
        };
        self.busy = false;
        ok
    }

    /// Submit the held password-change form; the fields clear on success.
    pub async fn change_password(&mut self) -> bool {
        if self.busy {
            debug!("password change already in flight, ignoring submit");
            return false;
        }
        self.busy = true;
        self.errors.clear();
        self.last_error = None;

        let ok = match self.client.change_password(&self.password_form).await {
            Ok(envelope) if envelope.success => {
                self.password_form = PasswordChangeRequest::default();
                true
            }
            Ok(envelope) => {
                if let Some(errors) = &envelope.errors {
                    self.errors = errors.flatten();
                }
                self.last_error = Some(envelope.failure_message(PASSWORD_CHANGE_FAILED));
                false
            }
            Err(e) => {
                if !e.is_auth_error() {
                    warn!(error = %e, "password change failed");
                    self.last_error = Some(e.user_message().to_string());
                }
                false
            }
        };
        self.busy = false;
        ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryTokenStorage, SessionSignalBus, TokenPair, TokenStore};
    use crate::http::ClientConfig;
    use crate::nav::RecordingNavigator;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn flow_against(
        server: &MockServer,
        authenticated: bool,
    ) -> (ProfileFlow, TokenStore, Arc<RecordingNavigator>) {
        let store = TokenStore::new(MemoryTokenStorage::new());
        if authenticated {
            store.set(TokenPair {
                access: "acc".to_string(),
                refresh: "ref".to_string(),
            });
        }
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
        (ProfileFlow::new(Arc::new(client)), store, navigator)
    }

    #[tokio::test]
    async fn load_without_session_redirects_without_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/profile/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (mut flow, _store, navigator) = flow_against(&server, false).await;
        assert!(flow.load().await.is_none());
        assert_eq!(navigator.last(), Some(Route::SignIn));
    }

    #[tokio::test]
    async fn load_attaches_bearer_and_fills_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/profile/"))
            .and(header("authorization", "Bearer acc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "message": "",
                "data": {"user": {
                    "id": 9, "email": "a@b.com",
                    "first_name": "A", "last_name": "B",
                    "date_joined": "2024-05-01T10:00:00Z", "is_active": true
                }}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (mut flow, _store, _navigator) = flow_against(&server, true).await;
        let user = flow.load().await.cloned().unwrap();
        assert_eq!(user.id, 9);
        assert_eq!(user.email, "a@b.com");
    }

    #[tokio::test]
    async fn password_change_success_clears_held_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/password/change/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "message": "Password changed successfully"
            })))
            .mount(&server)
            .await;

        let (mut flow, _store, _navigator) = flow_against(&server, true).await;
        flow.password_form_mut().old_password = "old".to_string();
        flow.password_form_mut().new_password = "new".to_string();
        flow.password_form_mut().new_password_confirm = "new".to_string();

        assert!(flow.change_password().await);
        assert!(flow.password_form().old_password.is_empty());
        assert!(flow.password_form().new_password.is_empty());
    }
}
