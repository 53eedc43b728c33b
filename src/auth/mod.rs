//! Auth - who is signed in, injected wherever ownership matters.
//!
//! The query builder, presenter and listing service receive an
//! `Arc<dyn AuthProvider>` instead of reaching for global auth state.

mod in_memory;

use serde::{Deserialize, Serialize};

pub use in_memory::InMemoryAuthProvider;

/// Event name broadcast whenever the signed-in user changes.
pub const AUTH_STATE_CHANGED: &str = "auth-state-changed";

/// Sign-in status as a view sees it.
///
/// `pending` is true until the provider has resolved the initial session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthStatus {
    pub pending: bool,
    pub logged_in: bool,
}

/// Payload of an [`AUTH_STATE_CHANGED`] notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthChange {
    pub user_id: Option<String>,
}

/// Source of the current user.
pub trait AuthProvider: Send + Sync {
    /// The signed-in user's ID, if any.
    fn current_user(&self) -> Option<String>;

    fn status(&self) -> AuthStatus;

    fn is_signed_in(&self) -> bool {
        self.current_user().is_some()
    }
}
