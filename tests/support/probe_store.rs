//! A store wrapper that counts queries and can be switched off.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use estate_listings::{
    GetListing, InMemoryListingStore, ListingRecord, NewListing, QueryListings, StoreBatch,
    StoreError, StoreQuery, WriteListings,
};

#[derive(Default)]
pub struct ProbeStore {
    pub inner: InMemoryListingStore,
    queries: AtomicUsize,
    offline: AtomicBool,
}

impl ProbeStore {
    pub fn new(inner: InMemoryListingStore) -> Self {
        Self {
            inner,
            queries: AtomicUsize::new(0),
            offline: AtomicBool::new(false),
        }
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("store offline".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl QueryListings for ProbeStore {
    async fn query(&self, query: &StoreQuery) -> Result<StoreBatch, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.query(query).await
    }
}

#[async_trait]
impl GetListing for ProbeStore {
    async fn get(&self, id: &str) -> Result<Option<ListingRecord>, StoreError> {
        self.check()?;
        self.inner.get(id).await
    }
}

#[async_trait]
impl WriteListings for ProbeStore {
    async fn insert(&self, owner: &str, listing: NewListing) -> Result<ListingRecord, StoreError> {
        self.check()?;
        self.inner.insert(owner, listing).await
    }

    async fn update(&self, id: &str, listing: NewListing) -> Result<ListingRecord, StoreError> {
        self.check()?;
        self.inner.update(id, listing).await
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.check()?;
        self.inner.delete(id).await
    }
}
