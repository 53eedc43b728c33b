use thiserror::Error;

/// Error type for listing store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached or refused the call.
    #[error("listing store unavailable: {0}")]
    Unavailable(String),
    /// The underlying lock was poisoned during the named operation.
    #[error("listing store lock poisoned during {0}")]
    LockPoisoned(&'static str),
    /// Serialization/deserialization error.
    #[error("listing serialization error: {0}")]
    Serde(String),
    #[error("listing not found: {id}")]
    NotFound { id: String },
    #[error("listing already exists: {id}")]
    AlreadyExists { id: String },
}
