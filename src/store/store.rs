use async_trait::async_trait;

use super::StoreError;
use crate::listing::{ListingRecord, NewListing};
use crate::query::{CursorPosition, Filter, Sort};

/// One ordered scan request: filter, ordering, limit and an optional
/// position to resume strictly after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreQuery {
    pub filter: Filter,
    pub sort: Sort,
    pub limit: usize,
    pub after: Option<CursorPosition>,
}

impl StoreQuery {
    pub fn new(filter: Filter, limit: usize) -> Self {
        Self {
            filter,
            sort: Sort::default(),
            limit,
            after: None,
        }
    }

    pub fn after(mut self, position: CursorPosition) -> Self {
        self.after = Some(position);
        self
    }
}

/// Records returned by one scan, plus the position of the last of them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoreBatch {
    pub records: Vec<ListingRecord>,
    pub next: Option<CursorPosition>,
}

/// Run an ordered, filtered, limited scan.
///
/// Results must reflect a single consistent snapshot of the store and be
/// ordered by `query.sort`, starting strictly after `query.after`.
#[async_trait]
pub trait QueryListings: Send + Sync {
    async fn query(&self, query: &StoreQuery) -> Result<StoreBatch, StoreError>;
}

/// Read a single listing by ID.
#[async_trait]
pub trait GetListing: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<ListingRecord>, StoreError>;
}

/// Create, replace and delete listings.
#[async_trait]
pub trait WriteListings: Send + Sync {
    /// Store a new listing for `owner`. The store generates the ID and
    /// assigns the creation timestamp.
    async fn insert(&self, owner: &str, listing: NewListing) -> Result<ListingRecord, StoreError>;

    /// Replace a listing's fields, keeping its owner and creation timestamp.
    async fn update(&self, id: &str, listing: NewListing) -> Result<ListingRecord, StoreError>;

    /// Delete a listing by ID. Returns true if it existed.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

/// Full store trait combining all capabilities.
pub trait ListingStore: QueryListings + GetListing + WriteListings {}

// Blanket implementation: anything implementing all traits is a ListingStore
impl<T> ListingStore for T where T: QueryListings + GetListing + WriteListings {}
