//! Authentication events emitted by the pipeline and the session.
//!
//! Listeners are called synchronously, before the emitting call returns, so a
//! 401 has been fully handled by the time the caller sees its error. Listeners
//! are held weakly; the pipeline never keeps the session alive. Passive
//! observers can also subscribe to a `tokio::broadcast` feed; when it overflows
//! the oldest events are dropped.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::broadcast::{self, Receiver, Sender};
use tracing::debug;

const DEFAULT_CAPACITY: usize = 64;

/// Session-relevant events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// A request failed with HTTP 401.
    Unauthorized {
        /// Session generation the request was sent under.
        epoch: u64,
        /// Request path that was rejected.
        path: String,
    },
    /// A login was confirmed by the backend.
    LoggedIn {
        /// Member identifier of the new session.
        user_id: i64,
    },
    /// The user logged out explicitly.
    LoggedOut,
    /// A stored credential was discarded as expired or malformed during initialisation.
    Expired,
}

impl AuthEvent {
    /// Machine-friendly discriminator for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "unauthorized",
            Self::LoggedIn { .. } => "logged_in",
            Self::LoggedOut => "logged_out",
            Self::Expired => "expired",
        }
    }
}

/// Synchronous subscriber to [`AuthEvent`]s.
pub trait AuthListener: Send + Sync {
    /// Handle one event. Must not block on network I/O.
    fn on_auth_event(&self, event: &AuthEvent);
}

/// Fan-out hub for [`AuthEvent`]s.
#[derive(Clone)]
pub struct AuthEvents {
    listeners: Arc<Mutex<Vec<Weak<dyn AuthListener>>>>,
    sender: Sender<AuthEvent>,
}

impl AuthEvents {
    /// Hub with the default observer buffer.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(DEFAULT_CAPACITY);
        Self {
            listeners: Arc::new(Mutex::new(Vec::new())),
            sender,
        }
    }

    /// Register a synchronous listener. Dropped listeners are pruned on the next emit.
    pub fn subscribe(&self, listener: Weak<dyn AuthListener>) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    /// Observe events asynchronously.
    #[must_use]
    pub fn watch(&self) -> Receiver<AuthEvent> {
        self.sender.subscribe()
    }

    /// Deliver `event` to every live listener, then to observers.
    pub fn emit(&self, event: &AuthEvent) {
        let live: Vec<Arc<dyn AuthListener>> = {
            let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
            listeners.retain(|listener| listener.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };
        debug!(kind = event.kind(), listeners = live.len(), "auth event");
        for listener in live {
            listener.on_auth_event(event);
        }
        let _ = self.sender.send(event.clone());
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AuthEvents {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AuthEvents")
            .field("observers", &self.sender.receiver_count())
            .finish_non_exhaustive()
    }
}
