/*
[INPUT]:  Token pairs from successful auth responses, a storage backend
[OUTPUT]: Current token pair + a change notification per mutation
[POS]:    Auth layer - token lifecycle management
[UPDATE]: When changing the storage strategy or notification semantics
*/

use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::storage::TokenStorage;

const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// Access/refresh token pair. Both present or both absent, never one of the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl From<crate::types::TokensData> for TokenPair {
    fn from(tokens: crate::types::TokensData) -> Self {
        Self {
            access: tokens.access,
            refresh: tokens.refresh,
        }
    }
}

/// Process-wide token store over a pluggable backend.
///
/// Mutations replace or remove both tokens atomically from an observer's
/// perspective and emit exactly one change notification each. Backend
/// failures are logged and degrade the store to unauthenticated; they are
/// never returned to the caller.
///
/// Cloning shares the cached pair and the notification channel; a second
/// tab on the same origin is a second `TokenStore` over a shared backend,
/// not a clone.
#[derive(Debug, Clone)]
pub struct TokenStore {
    cached: Arc<RwLock<Option<TokenPair>>>,
    storage: Arc<dyn TokenStorage>,
    changed: broadcast::Sender<()>,
}

impl TokenStore {
    /// Create a store over the given backend, loading any persisted pair.
    pub fn new(storage: impl TokenStorage + 'static) -> Self {
        let storage: Arc<dyn TokenStorage> = Arc::new(storage);
        let initial = match storage.load() {
            Ok(pair) => pair,
            Err(e) => {
                warn!(error = %e, "failed to load stored tokens, starting unauthenticated");
                None
            }
        };
        let (changed, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);

        Self {
            cached: Arc::new(RwLock::new(initial)),
            storage,
            changed,
        }
    }

    /// Get the current token pair, if any.
    pub fn get(&self) -> Option<TokenPair> {
        self.cached.read().unwrap().clone()
    }

    /// Current access token, if any.
    pub fn access_token(&self) -> Option<String> {
        self.cached.read().unwrap().as_ref().map(|p| p.access.clone())
    }

    /// Current refresh token, if any.
    pub fn refresh_token(&self) -> Option<String> {
        self.cached.read().unwrap().as_ref().map(|p| p.refresh.clone())
    }

    /// Whether a session exists right now: an access token is present.
    pub fn is_authenticated(&self) -> bool {
        self.cached.read().unwrap().is_some()
    }

    /// Replace both tokens. Emits one change notification.
    ///
    /// If the backend write fails the store degrades to unauthenticated
    /// rather than keeping a pair it could not persist.
    pub fn set(&self, pair: TokenPair) {
        let next = match self.storage.store(&pair) {
            Ok(()) => Some(pair),
            Err(e) => {
                warn!(error = %e, "token storage unavailable, degrading to unauthenticated");
                let _ = self.storage.clear();
                None
            }
        };
        *self.cached.write().unwrap() = next;
        self.notify();
    }

    /// Remove both tokens. Emits one change notification.
    pub fn clear(&self) {
        self.take_if_present();
    }

    /// Clear the pair and report whether one was present.
    ///
    /// The first concurrent caller observes `true` and performs side effects;
    /// later callers observe `false`. The 401 interceptor relies on this for
    /// its exactly-once guarantee.
    pub(crate) fn take_if_present(&self) -> bool {
        let was_present = {
            let mut guard = self.cached.write().unwrap();
            guard.take().is_some()
        };
        if let Err(e) = self.storage.clear() {
            warn!(error = %e, "failed to clear persisted tokens");
        }
        if was_present {
            self.notify();
        }
        was_present
    }

    /// Re-read the backend, picking up writes from other tabs.
    ///
    /// Emits a change notification only when the cached view actually moved.
    /// Returns whether the store is authenticated afterwards.
    pub fn reload(&self) -> bool {
        let loaded = match self.storage.load() {
            Ok(pair) => pair,
            Err(e) => {
                warn!(error = %e, "failed to reload stored tokens, treating as unauthenticated");
                None
            }
        };

        let changed = {
            let mut guard = self.cached.write().unwrap();
            let changed = *guard != loaded;
            *guard = loaded;
            changed
        };
        if changed {
            debug!("token store picked up an external change");
            self.notify();
        }
        self.is_authenticated()
    }

    /// Subscribe to change notifications (one per set/clear).
    pub fn subscribe_changes(&self) -> broadcast::Receiver<()> {
        self.changed.subscribe()
    }

    fn notify(&self) {
        // No receivers is fine; the session service may not be up yet.
        let _ = self.changed.send(());
    }
}

#[cfg(test)]
mod tests {
    use super::super::storage::{MemoryTokenStorage, StorageError, TokenStorage};
    use super::*;

    fn pair() -> TokenPair {
        TokenPair {
            access: "access-jwt".to_string(),
            refresh: "refresh-jwt".to_string(),
        }
    }

    #[test]
    fn set_then_get_returns_both_tokens() {
        let store = TokenStore::new(MemoryTokenStorage::new());
        assert!(!store.is_authenticated());

        store.set(pair());
        assert_eq!(store.get(), Some(pair()));
        assert_eq!(store.access_token().as_deref(), Some("access-jwt"));
        assert_eq!(store.refresh_token().as_deref(), Some("refresh-jwt"));
    }

    #[test]
    fn clear_then_get_is_always_absent() {
        let store = TokenStore::new(MemoryTokenStorage::new());
        store.set(pair());
        store.clear();

        assert_eq!(store.get(), None);
        assert_eq!(store.access_token(), None);
        assert_eq!(store.refresh_token(), None);
    }

    #[test]
    fn each_mutation_emits_exactly_one_notification() {
        let store = TokenStore::new(MemoryTokenStorage::new());
        let mut rx = store.subscribe_changes();

        store.set(pair());
        store.clear();

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn clearing_an_empty_store_does_not_notify() {
        let store = TokenStore::new(MemoryTokenStorage::new());
        let mut rx = store.subscribe_changes();

        store.clear();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn take_if_present_reports_only_the_first_caller() {
        let store = TokenStore::new(MemoryTokenStorage::new());
        store.set(pair());

        assert!(store.take_if_present());
        assert!(!store.take_if_present());
    }

    #[test]
    fn reload_picks_up_another_tabs_write() {
        let storage = MemoryTokenStorage::new();
        let tab_a = TokenStore::new(storage.clone());
        let tab_b = TokenStore::new(storage);

        tab_a.set(pair());
        assert!(!tab_b.is_authenticated());

        assert!(tab_b.reload());
        assert_eq!(tab_b.get(), Some(pair()));
    }

    #[derive(Debug)]
    struct FailingStorage;

    impl TokenStorage for FailingStorage {
        fn load(&self) -> Result<Option<TokenPair>, StorageError> {
            Ok(None)
        }
        fn store(&self, _pair: &TokenPair) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("quota exceeded")))
        }
        fn clear(&self) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn storage_failure_degrades_to_unauthenticated() {
        let store = TokenStore::new(FailingStorage);
        store.set(pair());

        assert!(!store.is_authenticated());
        assert_eq!(store.get(), None);
    }
}
