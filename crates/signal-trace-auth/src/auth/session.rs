/*
[INPUT]:  Token store change notifications + cross-tab signals + focus rechecks
[OUTPUT]: One observable "authenticated?" boolean shared by all subscribers
[POS]:    Auth layer - session state distribution (no network logic)
[UPDATE]: When changing recompute triggers or cross-tab transport
*/

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use super::claims;
use super::tokens::TokenStore;

const SIGNAL_CHANNEL_CAPACITY: usize = 32;

/// Payload-free "re-check state" trigger carried between tabs.
///
/// The origin id exists only so a tab can ignore its own signals, the way
/// browsers deliver storage events only to other tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSignal {
    origin: Uuid,
}

/// Cross-tab signal channel for one storage origin.
///
/// `clone()` keeps the same tab identity (hand clones to the client and the
/// session service of one tab). `attach()` joins the same channel under a new
/// identity and models another tab.
#[derive(Debug, Clone)]
pub struct SessionSignalBus {
    tx: broadcast::Sender<SessionSignal>,
    origin: Uuid,
}

impl SessionSignalBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(SIGNAL_CHANNEL_CAPACITY);
        Self {
            tx,
            origin: Uuid::new_v4(),
        }
    }

    /// Join the same channel as another tab.
    pub fn attach(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            origin: Uuid::new_v4(),
        }
    }

    /// Broadcast a re-check trigger to every tab (including our own, which
    /// filters it out by origin).
    pub fn publish(&self) {
        let _ = self.tx.send(SessionSignal {
            origin: self.origin,
        });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionSignal> {
        self.tx.subscribe()
    }

    pub fn origin(&self) -> Uuid {
        self.origin
    }
}

impl Default for SessionSignalBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of the session for UI display.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub authenticated: bool,
    /// Advisory expiry from the access token's `exp` claim, when decodable.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Single source of truth for "is there a usable session right now".
///
/// Recomputes on local token mutations, cross-tab signals, and explicit focus
/// rechecks, and publishes the boolean through a `watch` channel so every
/// subscriber reads the same value within one signal-processing cycle. A
/// present access token reads as authenticated until a request fails; there
/// is no real-time validity check against the server.
#[derive(Debug)]
pub struct SessionService {
    store: TokenStore,
    bus: SessionSignalBus,
    authenticated: watch::Sender<bool>,
    shutdown: CancellationToken,
}

impl SessionService {
    /// Create the service and start its listener task.
    ///
    /// The bus handle must share the tab identity of the client publishing
    /// on it, so the listener skips this tab's own signals.
    pub fn new(store: TokenStore, bus: SessionSignalBus) -> Self {
        let (authenticated, _) = watch::channel(store.is_authenticated());
        let shutdown = CancellationToken::new();

        if tokio::runtime::Handle::try_current().is_ok() {
            let listener = Listener {
                store: store.clone(),
                local_rx: store.subscribe_changes(),
                bus_rx: bus.subscribe(),
                own_origin: bus.origin(),
                authenticated: authenticated.clone(),
                shutdown: shutdown.clone(),
            };
            tokio::spawn(listener.run());
        } else {
            warn!("SessionService created without a Tokio runtime; listener not started");
        }

        Self {
            store,
            bus,
            authenticated,
            shutdown,
        }
    }

    /// Subscribe to the authenticated flag. The receiver always holds the
    /// latest value.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.authenticated.subscribe()
    }

    /// Current authenticated flag.
    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    /// Fallback recheck for when the window regains focus: another tab's
    /// logout or login may have happened while we were in the background.
    pub fn on_focus_regained(&self) {
        let now = self.store.reload();
        publish_state(&self.authenticated, now);
    }

    /// Session view for UI display, with advisory token expiry.
    pub fn snapshot(&self) -> SessionSnapshot {
        let access = self.store.access_token();
        let expires_at = access
            .as_deref()
            .and_then(|token| claims::decode_claims(token).ok())
            .and_then(|c| c.expires_at());
        SessionSnapshot {
            authenticated: access.is_some(),
            expires_at,
        }
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    pub fn bus(&self) -> &SessionSignalBus {
        &self.bus
    }
}

impl Drop for SessionService {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

struct Listener {
    store: TokenStore,
    local_rx: broadcast::Receiver<()>,
    bus_rx: broadcast::Receiver<SessionSignal>,
    own_origin: Uuid,
    authenticated: watch::Sender<bool>,
    shutdown: CancellationToken,
}

impl Listener {
    async fn run(mut self) {
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                res = self.local_rx.recv() => match res {
                    Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
                        publish_state(&self.authenticated, self.store.is_authenticated());
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                res = self.bus_rx.recv() => match res {
                    Ok(signal) => {
                        if signal.origin != self.own_origin {
                            debug!("cross-tab session signal received");
                            let now = self.store.reload();
                            publish_state(&self.authenticated, now);
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => {
                        let now = self.store.reload();
                        publish_state(&self.authenticated, now);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }
    }
}

fn publish_state(tx: &watch::Sender<bool>, value: bool) {
    tx.send_if_modified(|current| {
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    });
}
