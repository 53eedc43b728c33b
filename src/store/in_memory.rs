//! InMemoryListingStore - HashMap-backed listing store for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{GetListing, QueryListings, StoreBatch, StoreError, StoreQuery, WriteListings};
use crate::listing::{Listing, ListingRecord, NewListing};
use crate::query::CursorPosition;

#[derive(Default)]
struct Collection {
    /// listing documents as stored JSON, keyed by ID
    documents: HashMap<String, Vec<u8>>,
    last_created_at: Option<DateTime<Utc>>,
}

impl Collection {
    /// Creation timestamps never go backwards within the collection.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let assigned = match self.last_created_at {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_created_at = Some(assigned);
        assigned
    }

    fn load(&self, id: &str) -> Result<Option<Listing>, StoreError> {
        self.documents.get(id).map(|bytes| decode(bytes)).transpose()
    }
}

/// In-memory listing store.
///
/// Documents are kept serialized so reads hand out fresh copies. Clone-friendly
/// via Arc.
#[derive(Clone, Default)]
pub struct InMemoryListingStore {
    collection: Arc<RwLock<Collection>>,
}

impl InMemoryListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a record in as-is, keeping its ID and creation timestamp.
    pub fn seed(&self, record: ListingRecord) -> Result<(), StoreError> {
        let bytes = encode(&record.listing)?;
        let mut collection = self
            .collection
            .write()
            .map_err(|_| StoreError::LockPoisoned("seed"))?;

        if collection.documents.contains_key(&record.id) {
            return Err(StoreError::AlreadyExists { id: record.id });
        }

        let created_at = record.listing.created_at;
        if collection.last_created_at.map_or(true, |last| created_at > last) {
            collection.last_created_at = Some(created_at);
        }
        collection.documents.insert(record.id, bytes);
        Ok(())
    }

    /// Number of stored listings.
    pub fn len(&self) -> Result<usize, StoreError> {
        let collection = self
            .collection
            .read()
            .map_err(|_| StoreError::LockPoisoned("len"))?;
        Ok(collection.documents.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl QueryListings for InMemoryListingStore {
    async fn query(&self, query: &StoreQuery) -> Result<StoreBatch, StoreError> {
        let collection = self
            .collection
            .read()
            .map_err(|_| StoreError::LockPoisoned("query"))?;

        let mut matching = Vec::new();
        for (id, bytes) in collection.documents.iter() {
            let listing = decode(bytes)?;
            if query.filter.matches(&listing) {
                matching.push(ListingRecord::new(id.clone(), listing));
            }
        }
        drop(collection);

        matching.sort_by(|a, b| query.sort.compare(a, b));

        let records: Vec<ListingRecord> = matching
            .into_iter()
            .filter(|record| match &query.after {
                Some(position) => query.sort.is_after(record, position),
                None => true,
            })
            .take(query.limit)
            .collect();

        tracing::debug!(
            filter = %query.filter,
            limit = query.limit,
            resumed = query.after.is_some(),
            returned = records.len(),
            "listing query"
        );

        Ok(StoreBatch {
            next: records.last().map(CursorPosition::of),
            records,
        })
    }
}

#[async_trait]
impl GetListing for InMemoryListingStore {
    async fn get(&self, id: &str) -> Result<Option<ListingRecord>, StoreError> {
        let collection = self
            .collection
            .read()
            .map_err(|_| StoreError::LockPoisoned("get"))?;

        Ok(collection
            .load(id)?
            .map(|listing| ListingRecord::new(id, listing)))
    }
}

#[async_trait]
impl WriteListings for InMemoryListingStore {
    async fn insert(&self, owner: &str, listing: NewListing) -> Result<ListingRecord, StoreError> {
        let mut collection = self
            .collection
            .write()
            .map_err(|_| StoreError::LockPoisoned("insert"))?;

        let id = Uuid::new_v4().to_string();
        let created_at = collection.next_timestamp();
        let listing = listing.into_listing(owner, created_at);

        collection.documents.insert(id.clone(), encode(&listing)?);
        tracing::debug!(id = %id, owner = %owner, "listing inserted");

        Ok(ListingRecord::new(id, listing))
    }

    async fn update(&self, id: &str, listing: NewListing) -> Result<ListingRecord, StoreError> {
        let mut collection = self
            .collection
            .write()
            .map_err(|_| StoreError::LockPoisoned("update"))?;

        let existing = collection
            .load(id)?
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        let listing = listing.into_listing(existing.owner, existing.created_at);

        collection.documents.insert(id.to_string(), encode(&listing)?);
        tracing::debug!(id = %id, "listing updated");

        Ok(ListingRecord::new(id, listing))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut collection = self
            .collection
            .write()
            .map_err(|_| StoreError::LockPoisoned("delete"))?;

        Ok(collection.documents.remove(id).is_some())
    }
}

fn encode(listing: &Listing) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(listing).map_err(|e| StoreError::Serde(e.to_string()))
}

fn decode(bytes: &[u8]) -> Result<Listing, StoreError> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Serde(e.to_string()))
}
