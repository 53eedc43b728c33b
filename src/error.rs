use thiserror::Error;

use crate::listing::ValidationError;
use crate::store::StoreError;

/// Errors surfaced by the query builder, pager and listing service.
///
/// Every failure is reported once to the caller; nothing here is retried.
#[derive(Debug, Error)]
pub enum ListingError {
    /// An owner-scoped operation was requested with nobody signed in.
    #[error("not authenticated")]
    NotAuthenticated,
    /// The signed-in user does not own the listing.
    #[error("listing {id} is not owned by {user_id}")]
    NotOwner { id: String, user_id: String },
    /// A `by-owner:<id>` view named someone other than the signed-in user.
    #[error("listings of {requested} are not visible to {user_id}")]
    OwnerMismatch { requested: String, user_id: String },
    /// Owners cannot contact themselves about their own listing.
    #[error("listing {id} belongs to the signed-in user")]
    OwnListing { id: String },
    #[error("no lister profile for {user_id}")]
    ListerNotFound { user_id: String },
    #[error("listing not found: {id}")]
    NotFound { id: String },
    /// The store call failed; previously fetched state is untouched.
    #[error("query failed: {0}")]
    QueryFailed(#[from] StoreError),
    #[error("validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
    /// The cursor is malformed or was produced under a different query.
    #[error("invalid cursor: {0}")]
    InvalidCursor(String),
    #[error("unknown view: {0}")]
    UnknownView(String),
    #[error("page size must be greater than zero")]
    ZeroPageSize,
}

impl ListingError {
    /// True when the caller should send the user to sign in rather than retry.
    pub fn requires_sign_in(&self) -> bool {
        matches!(self, ListingError::NotAuthenticated)
    }
}
