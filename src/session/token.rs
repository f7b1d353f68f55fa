//! Auth token session
//!
//! Holds at most one bearer token, persisted through a [`KeyValueStore`].
//! Every mutation is broadcast to subscribers so views created before the
//! change can re-derive their authenticated state without being rebuilt.

use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use super::route::Route;
use super::store::{KeyValueStore, MemoryStore, StoreResult, TOKEN_KEY};

/// Capacity of the session event channel
const EVENT_CAPACITY: usize = 16;

/// A change in authentication state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A token was stored after login
    LoggedIn,
    /// The token was removed on user request
    LoggedOut,
    /// The server rejected the token; the UI should move to `redirect`
    Expired { redirect: Route },
}

impl SessionEvent {
    /// Authentication state after this event
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionEvent::LoggedIn)
    }
}

/// Injectable session shared by the HTTP client and the pages
pub struct Session {
    store: Arc<dyn KeyValueStore>,
    token: RwLock<Option<String>>,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    /// Open a session, loading any token persisted in `store`
    pub async fn load(store: Arc<dyn KeyValueStore>) -> StoreResult<Self> {
        let token = store.get(TOKEN_KEY).await?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        tracing::debug!(authenticated = token.is_some(), "Session loaded");

        Ok(Self {
            store,
            token: RwLock::new(token),
            events,
        })
    }

    /// Empty session backed by process memory
    pub fn in_memory() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store: Arc::new(MemoryStore::new()),
            token: RwLock::new(None),
            events,
        }
    }

    /// The store backing this session
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store)
    }

    /// Current token, if any
    pub async fn get(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Whether a token is present
    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Store a new token, replacing any previous one
    pub async fn set(&self, token: impl Into<String>) -> StoreResult<()> {
        let token = token.into();
        let mut guard = self.token.write().await;
        self.store.set(TOKEN_KEY, &token).await?;
        *guard = Some(token);
        drop(guard);

        tracing::info!("Session token stored");
        self.notify(SessionEvent::LoggedIn);
        Ok(())
    }

    /// Remove the token on user request
    pub async fn clear(&self) -> StoreResult<()> {
        self.remove_token().await?;
        tracing::info!("Session cleared");
        self.notify(SessionEvent::LoggedOut);
        Ok(())
    }

    /// Remove the token after the server rejected it
    ///
    /// Returns the route the UI must navigate to.
    pub async fn expire(&self) -> StoreResult<Route> {
        let redirect = Route::login_expired();
        self.remove_token().await?;
        tracing::warn!(redirect = %redirect, "Session expired");
        self.notify(SessionEvent::Expired { redirect });
        Ok(redirect)
    }

    /// Subscribe to authentication changes
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    async fn remove_token(&self) -> StoreResult<()> {
        let mut guard = self.token.write().await;
        // Drop the in-memory token even if persisting the removal fails
        *guard = None;
        self.store.remove(TOKEN_KEY).await
    }

    fn notify(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("subscribers", &self.events.receiver_count())
            .finish_non_exhaustive()
    }
}
