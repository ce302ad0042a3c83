/*
[INPUT]:  The signed-in session's refresh token
[OUTPUT]: Server-side token invalidation (best effort) + unconditional local logout
[POS]:    Flow layer - logout
[UPDATE]: When the logout contract changes
*/

use std::sync::Arc;

use tracing::{debug, warn};

use crate::http::AuthApiClient;
use crate::nav::Route;

/// Logout lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutState {
    Idle,
    Submitting,
    Done,
}

/// Logout flow. The server call is best effort; the local clear, broadcast,
/// and redirect happen even when it fails or times out, so "log me out on
/// this device" is always honored locally.
#[derive(Debug)]
pub struct LogoutFlow {
    client: Arc<AuthApiClient>,
    state: LogoutState,
}

impl LogoutFlow {
    pub fn new(client: Arc<AuthApiClient>) -> Self {
        Self {
            client,
            state: LogoutState::Idle,
        }
    }

    pub fn state(&self) -> LogoutState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state == LogoutState::Submitting
    }

    /// Log out. Duplicate submits are ignored.
    pub async fn submit(&mut self) -> LogoutState {
        if self.is_busy() {
            debug!("logout already in flight, ignoring submit");
            return self.state;
        }
        self.state = LogoutState::Submitting;

        if let Some(refresh) = self.client.token_store().refresh_token() {
            match self.client.logout(&refresh).await {
                Ok(envelope) if envelope.success => debug!("server acknowledged logout"),
                Ok(envelope) => {
                    warn!(message = %envelope.message, "server declined logout notification")
                }
                Err(e) => {
                    warn!(error = %e, "logout notification failed, clearing local session anyway")
                }
            }
        }

        self.client.token_store().clear();
        self.client.signal_bus().publish();
        self.client.navigator().push(Route::SignIn);

        self.state = LogoutState::Done;
        self.state
    }
}
