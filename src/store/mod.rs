//! Listing stores - the document database holding listing records.
//!
//! The store is an external collaborator; this module only fixes the
//! interface the pager and the listing service need from it, plus an
//! in-memory implementation for tests and development.
//!
//! ## Example
//!
//! ```ignore
//! use estate_listings::{InMemoryListingStore, QueryListings, StoreQuery};
//!
//! let store = InMemoryListingStore::new();
//! let record = store.insert("user-1", new_listing).await?;
//! let batch = store.query(&StoreQuery::new(Filter::HasOffer(true), 8)).await?;
//! ```

mod error;
mod in_memory;
mod store;

pub use error::StoreError;
pub use in_memory::InMemoryListingStore;
pub use store::{
    GetListing, ListingStore, QueryListings, StoreBatch, StoreQuery, WriteListings,
};
