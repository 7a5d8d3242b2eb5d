//! The session record and its mutators

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::preferences::ColorScheme;
use crate::store::{CredentialStore, PersistedSession};

/// Credential pair returned by the login and refresh exchanges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// In-memory session state
///
/// Empty strings mean unauthenticated; both credentials are opaque to the
/// client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub access_token: String,
    pub refresh_token: String,
    pub role: String,
}

/// Session lifecycle notifications
///
/// The clinic front-ends reacted to these by navigating (logout lands on
/// the sign-in route); here they are plain events for the embedder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    TokensRefreshed,
    LoggedOut,
}

type Observer = Box<dyn Fn(SessionEvent) + Send + Sync>;

struct SessionInner {
    state: RwLock<SessionState>,
    color_scheme: RwLock<ColorScheme>,
    // bumped on every credential change so racing requests can tell whether
    // a refresh already happened since they last read the tokens
    generation: AtomicU64,
    store: Option<Arc<dyn CredentialStore>>,
    observer: RwLock<Option<Observer>>,
}

/// Clonable handle to the session record
///
/// One logical session exists per running client; it is passed explicitly
/// into the HTTP client rather than living in a module-level singleton, so
/// tests can run several independent sessions side by side.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create an empty, unauthenticated session with no persistence
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create a session backed by a credential store
    pub fn with_store(store: impl CredentialStore + 'static) -> Self {
        Self::build(Some(Arc::new(store)))
    }

    /// Create a session sharing an already-shared credential store
    pub fn with_shared_store(store: Arc<dyn CredentialStore>) -> Self {
        Self::build(Some(store))
    }

    fn build(store: Option<Arc<dyn CredentialStore>>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                state: RwLock::new(SessionState::default()),
                color_scheme: RwLock::new(ColorScheme::default()),
                generation: AtomicU64::new(0),
                store,
                observer: RwLock::new(None),
            }),
        }
    }

    /// Register the observer notified of session events
    pub fn set_observer(&self, observer: impl Fn(SessionEvent) + Send + Sync + 'static) {
        *self.inner.observer.write() = Some(Box::new(observer));
    }

    /// Current access credential, empty when unauthenticated
    pub fn access_token(&self) -> String {
        self.inner.state.read().access_token.clone()
    }

    /// Current refresh credential, empty when unauthenticated
    pub fn refresh_token(&self) -> String {
        self.inner.state.read().refresh_token.clone()
    }

    /// Role identifier, empty when unauthenticated
    pub fn role(&self) -> String {
        self.inner.state.read().role.clone()
    }

    pub fn set_role(&self, role: impl Into<String>) {
        self.inner.state.write().role = role.into();
    }

    pub fn is_authenticated(&self) -> bool {
        !self.inner.state.read().access_token.is_empty()
    }

    /// Credential generation; changes whenever the tokens change
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    pub fn color_scheme(&self) -> ColorScheme {
        *self.inner.color_scheme.read()
    }

    pub fn set_color_scheme(&self, scheme: ColorScheme) {
        *self.inner.color_scheme.write() = scheme;
        self.persist();
    }

    /// Flip between light and dark and persist the choice
    pub fn toggle_color_scheme(&self) -> ColorScheme {
        let next = {
            let mut scheme = self.inner.color_scheme.write();
            *scheme = scheme.toggle();
            *scheme
        };
        self.persist();
        next
    }

    /// Store a fresh credential pair
    ///
    /// Called after a successful login or refresh exchange. Bumps the
    /// generation, persists, and notifies the observer.
    pub fn set_tokens(&self, tokens: TokenPair) {
        {
            let mut state = self.inner.state.write();
            state.access_token = tokens.access_token;
            state.refresh_token = tokens.refresh_token;
        }
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        debug!(generation = self.generation(), "session tokens updated");
        self.persist();
        self.notify(SessionEvent::TokensRefreshed);
    }

    /// Invalidate the session
    ///
    /// Clears credentials and role, drops the persisted record, and emits
    /// [`SessionEvent::LoggedOut`]. Used for explicit logout and for
    /// irrecoverable refresh failures alike.
    pub fn logout(&self) {
        {
            let mut state = self.inner.state.write();
            *state = SessionState::default();
        }
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        debug!("session invalidated");
        if let Some(store) = &self.inner.store {
            if let Err(err) = store.clear() {
                warn!("failed to clear persisted session: {err}");
            }
        }
        self.notify(SessionEvent::LoggedOut);
    }

    /// Repopulate credentials and preferences from the store
    ///
    /// The storage half of the front-end's startup handshake; fetching the
    /// role back from the backend is the API layer's job.
    pub fn restore(&self) -> Result<bool> {
        let Some(store) = &self.inner.store else {
            return Ok(false);
        };
        let Some(record) = store.load()? else {
            return Ok(false);
        };
        {
            let mut state = self.inner.state.write();
            state.access_token = record.access_token;
            state.refresh_token = record.refresh_token;
        }
        *self.inner.color_scheme.write() = record.color_scheme;
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        debug!("session restored from store");
        Ok(true)
    }

    // Persistence is best effort: a failing disk must not break the auth
    // protocol itself.
    fn persist(&self) {
        if let Some(store) = &self.inner.store {
            let record = {
                let state = self.inner.state.read();
                PersistedSession {
                    access_token: state.access_token.clone(),
                    refresh_token: state.refresh_token.clone(),
                    color_scheme: *self.inner.color_scheme.read(),
                }
            };
            if let Err(err) = store.save(&record) {
                warn!("failed to persist session: {err}");
            }
        }
    }

    fn notify(&self, event: SessionEvent) {
        if let Some(observer) = self.inner.observer.read().as_ref() {
            observer(event);
        }
    }
}
