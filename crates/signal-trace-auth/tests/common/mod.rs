/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test fixtures: one "tab" = store + bus + client + navigator
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for signal-trace-auth tests

use std::sync::Arc;

use signal_trace_auth::{
    AuthApiClient, ClientConfig, MemoryTokenStorage, RecordingNavigator, SessionSignalBus,
    TokenPair, TokenStore,
};
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// A browser tab in miniature: its own store view, bus identity, client,
/// and navigator, all over a shared storage origin.
#[allow(dead_code)]
pub struct TestTab {
    pub store: TokenStore,
    pub bus: SessionSignalBus,
    pub navigator: Arc<RecordingNavigator>,
    pub client: Arc<AuthApiClient>,
}

/// Build a tab over its own private storage origin.
#[allow(dead_code)]
pub fn tab(server_uri: &str) -> TestTab {
    tab_on(server_uri, MemoryTokenStorage::new(), SessionSignalBus::new())
}

/// Build a tab over an existing origin (same storage, same signal channel).
#[allow(dead_code)]
pub fn tab_on(server_uri: &str, storage: MemoryTokenStorage, bus: SessionSignalBus) -> TestTab {
    let store = TokenStore::new(storage);
    let navigator = Arc::new(RecordingNavigator::new());
    let client = AuthApiClient::with_config(
        ClientConfig {
            base_url: server_uri.to_string(),
            ..ClientConfig::default()
        },
        store.clone(),
        bus.clone(),
        navigator.clone(),
    )
    .expect("client config");
    TestTab {
        store,
        bus,
        navigator,
        client: Arc::new(client),
    }
}

/// Token pair used across tests
#[allow(dead_code)]
pub fn test_pair() -> TokenPair {
    TokenPair {
        access: "access-jwt".to_string(),
        refresh: "refresh-jwt".to_string(),
    }
}
