/*
[INPUT]:  HTTP configuration (base URL, timeouts), token store, navigator
[OUTPUT]: Envelope-parsed API calls with centralized session invalidation
[POS]:    HTTP layer - core client implementation
[UPDATE]: When changing request dispatch or 401 handling
*/

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::{SessionSignalBus, TokenStore};
use crate::nav::{Navigator, Route};

use super::envelope::ApiEnvelope;
use super::error::{AuthError, Result};

/// Development default, matching the site's local backend origin.
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Whether an endpoint expects a bearer credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRequirement {
    /// Attach the access token when one exists. If none exists the request
    /// still goes out bare; the server makes the authorization decision.
    Required,
    /// Never attach a credential (login, signup, OTP, password reset).
    Public,
}

/// HTTP client for the Signal Trace auth API.
///
/// Every response is parsed into [`ApiEnvelope`]; `success = false` is an
/// `Ok` result so callers can bind field errors. The 401 interceptor lives
/// here and nowhere else: a 401 on an auth-required request clears the token
/// store, broadcasts the session signal, and navigates to sign-in, exactly
/// once even when several in-flight requests fail together.
#[derive(Debug)]
pub struct AuthApiClient {
    http: Client,
    base_url: Url,
    store: TokenStore,
    bus: SessionSignalBus,
    navigator: Arc<dyn Navigator>,
}

impl AuthApiClient {
    /// Create a client with default configuration.
    pub fn new(
        store: TokenStore,
        bus: SessionSignalBus,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        Self::with_config(ClientConfig::default(), store, bus, navigator)
    }

    /// Create a client with custom configuration.
    pub fn with_config(
        config: ClientConfig,
        store: TokenStore,
        bus: SessionSignalBus,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: Url::parse(&config.base_url)?,
            store,
            bus,
            navigator,
        })
    }

    /// The token store this client consults and invalidates.
    pub fn token_store(&self) -> &TokenStore {
        &self.store
    }

    /// The cross-tab signal bus for this client's tab.
    pub fn signal_bus(&self) -> &SessionSignalBus {
        &self.bus
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    fn url(&self, endpoint: &str) -> Result<Url> {
        Ok(self.base_url.join(endpoint)?)
    }

    /// Issue one request and parse the envelope.
    ///
    /// `Err` means transport failure, a malformed body, or an invalidated
    /// session; a server-side "no" comes back as `Ok` with `success = false`.
    pub(crate) async fn request_json<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        auth: AuthRequirement,
    ) -> Result<ApiEnvelope<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut builder = self.http.request(method, self.url(endpoint)?);

        if auth == AuthRequirement::Required {
            if let Some(token) = self.store.access_token() {
                builder = builder.bearer_auth(token);
            }
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED && auth == AuthRequirement::Required {
            self.invalidate_session();
            return Err(AuthError::Unauthorized);
        }

        let bytes = response.bytes().await?;
        let envelope: ApiEnvelope<T> = serde_json::from_slice(&bytes)
            .map_err(|e| AuthError::InvalidResponse(format!("{status}: {e}")))?;

        if !envelope.success {
            debug!(%status, endpoint, message = %envelope.message, "API reported failure");
        }
        Ok(envelope)
    }

    /// Forced local logout after the server rejected the session.
    ///
    /// `take_if_present` lets exactly one of any number of concurrent 401s
    /// perform the clear + broadcast + redirect.
    fn invalidate_session(&self) {
        if self.store.take_if_present() {
            warn!("session rejected by server; clearing local tokens");
            self.bus.publish();
            self.navigator.push(Route::SignIn);
        }
    }
}
