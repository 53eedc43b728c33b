//! InMemoryAuthProvider - session held in memory, for tests and development.

use std::sync::{PoisonError, RwLock};

#[cfg(feature = "emitter")]
use std::sync::Mutex;

#[cfg(feature = "emitter")]
use event_emitter_rs::EventEmitter;

#[cfg(feature = "emitter")]
use super::AUTH_STATE_CHANGED;
use super::{AuthChange, AuthProvider, AuthStatus};

#[derive(Debug, Default)]
struct Session {
    user_id: Option<String>,
    resolved: bool,
}

/// In-memory auth provider.
///
/// With the `emitter` feature, every sign-in and sign-out is broadcast to the
/// listeners registered with [`InMemoryAuthProvider::on_change`].
pub struct InMemoryAuthProvider {
    session: RwLock<Session>,
    #[cfg(feature = "emitter")]
    emitter: Mutex<EventEmitter>,
}

impl Default for InMemoryAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAuthProvider {
    /// A provider that has not resolved its session yet.
    pub fn new() -> Self {
        Self {
            session: RwLock::new(Session::default()),
            #[cfg(feature = "emitter")]
            emitter: Mutex::new(EventEmitter::new()),
        }
    }

    /// A resolved provider with nobody signed in.
    pub fn anonymous() -> Self {
        let provider = Self::new();
        provider.write_session(None);
        provider
    }

    /// A resolved provider with `user_id` signed in.
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        let provider = Self::new();
        provider.write_session(Some(user_id.into()));
        provider
    }

    pub fn sign_in(&self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        tracing::info!(user_id = %user_id, "signed in");
        self.write_session(Some(user_id.clone()));
        self.notify(AuthChange {
            user_id: Some(user_id),
        });
    }

    pub fn sign_out(&self) {
        tracing::info!("signed out");
        self.write_session(None);
        self.notify(AuthChange { user_id: None });
    }

    /// Register a listener for auth-state changes. Returns the listener ID.
    ///
    /// Listeners run on their own threads; the change is fully delivered
    /// before `sign_in`/`sign_out` return. A listener must not register or
    /// remove listeners itself.
    #[cfg(feature = "emitter")]
    pub fn on_change<F>(&self, listener: F) -> String
    where
        F: Fn(AuthChange) + Send + Sync + 'static,
    {
        self.emitter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on(AUTH_STATE_CHANGED, listener)
    }

    /// Remove a listener registered with [`InMemoryAuthProvider::on_change`].
    #[cfg(feature = "emitter")]
    pub fn remove_listener(&self, listener_id: &str) -> bool {
        self.emitter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove_listener(listener_id)
            .is_some()
    }

    fn write_session(&self, user_id: Option<String>) {
        let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
        session.user_id = user_id;
        session.resolved = true;
    }

    #[cfg(feature = "emitter")]
    fn notify(&self, change: AuthChange) {
        let handles = self
            .emitter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .emit(AUTH_STATE_CHANGED, change);
        for handle in handles {
            if handle.join().is_err() {
                tracing::warn!("auth listener panicked");
            }
        }
    }

    #[cfg(not(feature = "emitter"))]
    fn notify(&self, _change: AuthChange) {}
}

impl AuthProvider for InMemoryAuthProvider {
    fn current_user(&self) -> Option<String> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .user_id
            .clone()
    }

    fn status(&self) -> AuthStatus {
        let session = self.session.read().unwrap_or_else(PoisonError::into_inner);
        AuthStatus {
            pending: !session.resolved,
            logged_in: session.user_id.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_pending() {
        let auth = InMemoryAuthProvider::new();
        assert_eq!(
            auth.status(),
            AuthStatus {
                pending: true,
                logged_in: false
            }
        );
        assert!(!auth.is_signed_in());
    }

    #[test]
    fn sign_in_and_out() {
        let auth = InMemoryAuthProvider::anonymous();
        assert!(!auth.status().pending);

        auth.sign_in("user-1");
        assert_eq!(auth.current_user().as_deref(), Some("user-1"));
        assert!(auth.status().logged_in);

        auth.sign_out();
        assert_eq!(auth.current_user(), None);
        assert!(!auth.status().logged_in);
        assert!(!auth.status().pending);
    }

    #[cfg(feature = "emitter")]
    #[test]
    fn listeners_see_every_change() {
        use std::sync::{Arc, Mutex};

        let auth = InMemoryAuthProvider::anonymous();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        let id = auth.on_change(move |change: AuthChange| {
            sink.lock().unwrap().push(change.user_id);
        });

        auth.sign_in("user-1");
        auth.sign_out();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Some("user-1".to_string()), None]
        );

        assert!(auth.remove_listener(&id));
        auth.sign_in("user-2");
        assert_eq!(seen.lock().unwrap().len(), 2);
    }
}
