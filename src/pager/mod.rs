//! Pager - runs a [`QuerySpec`] against a store with cursor-based continuation.
//!
//! [`fetch`] and [`next`] are the stateless pair: the first page of a spec,
//! then the page strictly after a cursor. [`Pager`] wraps them for a view,
//! accumulating pages in the order they arrive.
//!
//! Pagination ends when a page comes back shorter than its limit. A full page
//! says nothing about whether more records exist.

use std::sync::Arc;

use crate::error::ListingError;
use crate::listing::ListingRecord;
use crate::query::{CursorPosition, PageCursor, QuerySpec};
use crate::store::{QueryListings, StoreQuery};

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Records, newest first.
    pub records: Vec<ListingRecord>,
    /// Cursor to the last record, or `None` if the page is empty.
    pub cursor: Option<PageCursor>,
    /// The limit the page was requested with.
    pub limit: usize,
}

impl Page {
    /// True if the page came back shorter than requested: the scan is done.
    pub fn is_last(&self) -> bool {
        self.records.len() < self.limit
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Fetch the first page of `spec`.
///
/// A zero page size fails with `ZeroPageSize` before the store is called.
pub async fn fetch<S>(store: &S, spec: &QuerySpec) -> Result<Page, ListingError>
where
    S: QueryListings + ?Sized,
{
    run(store, spec, spec.page_sizes.initial, None).await
}

/// Fetch the page following `cursor`.
///
/// The cursor must come from a page of the same filter and ordering;
/// otherwise `InvalidCursor` is returned and the store is not called.
pub async fn next<S>(store: &S, spec: &QuerySpec, cursor: &PageCursor) -> Result<Page, ListingError>
where
    S: QueryListings + ?Sized,
{
    let position = cursor.position_for(spec)?;
    run(store, spec, spec.page_sizes.subsequent, Some(position)).await
}

async fn run<S>(
    store: &S,
    spec: &QuerySpec,
    limit: usize,
    after: Option<CursorPosition>,
) -> Result<Page, ListingError>
where
    S: QueryListings + ?Sized,
{
    if limit == 0 {
        return Err(ListingError::ZeroPageSize);
    }

    let query = StoreQuery {
        filter: spec.filter.clone(),
        sort: spec.sort,
        limit,
        after,
    };

    let batch = store.query(&query).await.map_err(|err| {
        tracing::warn!(filter = %spec.filter, error = %err, "listing query failed");
        ListingError::QueryFailed(err)
    })?;

    let cursor = batch
        .next
        .map(|position| PageCursor::encode(spec, position))
        .transpose()?;

    Ok(Page {
        records: batch.records,
        cursor,
        limit,
    })
}

/// Accumulating pager for one view.
///
/// `load` and `load_more` take `&mut self`, so a pager never has two loads in
/// flight. State is only touched after the store answers: a failed load, or a
/// load whose future is dropped, leaves the accumulated records and cursor as
/// they were.
pub struct Pager<S: ?Sized> {
    store: Arc<S>,
    spec: QuerySpec,
    records: Vec<ListingRecord>,
    cursor: Option<PageCursor>,
    loaded: bool,
    exhausted: bool,
}

impl<S> Pager<S>
where
    S: QueryListings + ?Sized,
{
    pub fn new(store: Arc<S>, spec: QuerySpec) -> Self {
        Self {
            store,
            spec,
            records: Vec::new(),
            cursor: None,
            loaded: false,
            exhausted: false,
        }
    }

    /// Load the first page, replacing anything loaded before.
    pub async fn load(&mut self) -> Result<&[ListingRecord], ListingError> {
        let page = fetch(self.store.as_ref(), &self.spec).await?;

        tracing::debug!(
            filter = %self.spec.filter,
            returned = page.len(),
            "first page loaded"
        );

        self.exhausted = page.is_last();
        self.cursor = page.cursor;
        self.records = page.records;
        self.loaded = true;
        Ok(&self.records)
    }

    /// Append the next page. Returns the records that were appended.
    ///
    /// Before the first load this performs the first load. Once the scan is
    /// exhausted it returns an empty slice without calling the store.
    pub async fn load_more(&mut self) -> Result<&[ListingRecord], ListingError> {
        if !self.loaded {
            return self.load().await;
        }

        let cursor = match (&self.cursor, self.exhausted) {
            (Some(cursor), false) => cursor.clone(),
            _ => {
                self.exhausted = true;
                return Ok(&[]);
            }
        };

        let page = next(self.store.as_ref(), &self.spec, &cursor).await?;

        tracing::debug!(
            filter = %self.spec.filter,
            returned = page.len(),
            total = self.records.len() + page.len(),
            "next page loaded"
        );

        self.exhausted = page.is_last();
        if page.cursor.is_some() {
            self.cursor = page.cursor;
        }

        let start = self.records.len();
        self.records.extend(page.records);
        Ok(&self.records[start..])
    }

    /// Everything loaded so far, in arrival order.
    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    pub fn cursor(&self) -> Option<&PageCursor> {
        self.cursor.as_ref()
    }

    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// True once a page came back short; further `load_more` calls are no-ops.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Drop a record from the accumulated list (after the owner deleted it).
    pub fn remove(&mut self, id: &str) -> Option<ListingRecord> {
        let index = self.records.iter().position(|record| record.id == id)?;
        Some(self.records.remove(index))
    }
}
