//! Queries - named views, filters, ordering and page sizes.
//!
//! A [`View`] names a browsing context (offers, rentals, sales, the signed-in
//! user's own listings). The [`QueryBuilder`] maps a view to a [`QuerySpec`]:
//! one equality filter, newest-first ordering and the page sizes to use for
//! the first and following pages.
//!
//! ## Example
//!
//! ```ignore
//! let builder = QueryBuilder::new(auth.clone(), &ListingsConfig::default());
//! let spec = builder.build_named("by-type:rent")?;
//! let page = pager::fetch(&store, &spec).await?;
//! ```

mod builder;
mod cursor;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::ListingError;
use crate::listing::{Listing, ListingRecord, ListingType};

pub use builder::QueryBuilder;
pub use cursor::{CursorPosition, PageCursor};

/// A named browsing context.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum View {
    /// Listings with an active offer.
    Offers,
    /// Listings of one type (rentals or sales).
    ByType(ListingType),
    /// The signed-in user's own listings.
    ByOwner,
    /// `by-owner:<id>`: listings of a named owner, who must be the signed-in
    /// user.
    OwnedBy(String),
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Offers => f.write_str("offers"),
            View::ByType(listing_type) => write!(f, "by-type:{}", listing_type),
            View::ByOwner => f.write_str("by-owner"),
            View::OwnedBy(owner) => write!(f, "by-owner:{}", owner),
        }
    }
}

impl FromStr for View {
    type Err = ListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "offers" => Ok(View::Offers),
            "by-owner" => Ok(View::ByOwner),
            other => {
                if let Some(owner) = other.strip_prefix("by-owner:") {
                    return match owner.trim() {
                        "" => Err(ListingError::UnknownView(other.to_string())),
                        owner => Ok(View::OwnedBy(owner.to_string())),
                    };
                }
                other
                    .strip_prefix("by-type:")
                    .and_then(|kind| kind.parse::<ListingType>().ok())
                    .map(View::ByType)
                    .ok_or_else(|| ListingError::UnknownView(other.to_string()))
            }
        }
    }
}

/// Equality predicate on a single listing field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Filter {
    HasOffer(bool),
    ListingType(ListingType),
    Owner(String),
}

impl Filter {
    /// The document field the predicate compares.
    pub fn field(&self) -> &'static str {
        match self {
            Filter::HasOffer(_) => "offer",
            Filter::ListingType(_) => "listingType",
            Filter::Owner(_) => "userRef",
        }
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        match self {
            Filter::HasOffer(offer) => listing.offer == *offer,
            Filter::ListingType(listing_type) => listing.listing_type == *listing_type,
            Filter::Owner(owner) => listing.owner == *owner,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::HasOffer(offer) => write!(f, "{}=={}", self.field(), offer),
            Filter::ListingType(listing_type) => write!(f, "{}=={}", self.field(), listing_type),
            Filter::Owner(owner) => write!(f, "{}=={}", self.field(), owner),
        }
    }
}

/// Result ordering.
///
/// Newest first by creation timestamp. Records created at the same instant
/// are ordered by ID, descending, so a cursor always names one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sort {
    #[default]
    CreatedAtDesc,
}

impl Sort {
    /// Compare two records; `Less` means `a` is returned before `b`.
    pub fn compare(&self, a: &ListingRecord, b: &ListingRecord) -> Ordering {
        match self {
            Sort::CreatedAtDesc => CursorPosition::of(b).cmp(&CursorPosition::of(a)),
        }
    }

    /// True if `record` sorts strictly after `position`.
    pub fn is_after(&self, record: &ListingRecord, position: &CursorPosition) -> bool {
        match self {
            Sort::CreatedAtDesc => CursorPosition::of(record) < *position,
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sort::CreatedAtDesc => f.write_str("createdAt:desc,id:desc"),
        }
    }
}

/// How many records to request for the first page and for each page after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageSizes {
    pub initial: usize,
    pub subsequent: usize,
}

impl PageSizes {
    pub fn new(initial: usize, subsequent: usize) -> Self {
        Self {
            initial,
            subsequent,
        }
    }

    /// Same size for every page.
    pub fn uniform(size: usize) -> Self {
        Self::new(size, size)
    }

    /// Both sizes must be non-zero; a zero limit never yields a short page,
    /// so a scan using it would never end.
    pub fn check(&self) -> Result<(), ListingError> {
        if self.initial == 0 || self.subsequent == 0 {
            return Err(ListingError::ZeroPageSize);
        }
        Ok(())
    }
}

impl Default for PageSizes {
    fn default() -> Self {
        Self::new(8, 4)
    }
}

/// A filter, an ordering and page sizes: everything needed to run a view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuerySpec {
    pub filter: Filter,
    pub sort: Sort,
    pub page_sizes: PageSizes,
}

impl QuerySpec {
    pub fn new(filter: Filter, page_sizes: PageSizes) -> Self {
        Self {
            filter,
            sort: Sort::default(),
            page_sizes,
        }
    }

    /// Identifies the filter and ordering. Page sizes are not part of it, so a
    /// cursor stays valid when only the page size changes.
    pub fn fingerprint(&self) -> String {
        format!("{}|{}", self.filter, self.sort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn record(id: &str, secs: i64) -> ListingRecord {
        ListingRecord::new(
            id,
            Listing {
                listing_type: ListingType::Sale,
                property_name: "House".into(),
                address: "Somewhere".into(),
                description: "A house".into(),
                bed: 3,
                bath: 2,
                price: 500_000,
                offer: false,
                discounted_price: None,
                parking: true,
                furnished: false,
                image_urls: vec!["https://img/house.png".into()],
                owner: "owner".into(),
                created_at: DateTime::<Utc>::from_timestamp(secs, 0).unwrap(),
            },
        )
    }

    #[test]
    fn view_names_round_trip() {
        for name in [
            "offers",
            "by-type:rent",
            "by-type:sale",
            "by-owner",
            "by-owner:user-1",
        ] {
            let view: View = name.parse().unwrap();
            assert_eq!(view.to_string(), name);
        }
    }

    #[test]
    fn unknown_view_names_are_rejected() {
        for name in ["", "rentals", "by-type:lease", "by-owner:", "by-owner: "] {
            assert!(matches!(
                name.parse::<View>(),
                Err(ListingError::UnknownView(_))
            ));
        }
    }

    #[test]
    fn owner_id_is_part_of_the_view() {
        assert_eq!(
            "by-owner:user-1".parse::<View>().unwrap(),
            View::OwnedBy("user-1".into())
        );
    }

    #[test]
    fn newest_first_with_id_tie_break() {
        let older = record("a", 100);
        let newer = record("b", 200);
        let tied = record("c", 200);

        let mut records = vec![older.clone(), newer.clone(), tied.clone()];
        records.sort_by(|a, b| Sort::CreatedAtDesc.compare(a, b));

        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn is_after_is_strict() {
        let position = CursorPosition::of(&record("b", 200));
        assert!(!Sort::CreatedAtDesc.is_after(&record("b", 200), &position));
        assert!(!Sort::CreatedAtDesc.is_after(&record("c", 200), &position));
        assert!(Sort::CreatedAtDesc.is_after(&record("a", 200), &position));
        assert!(Sort::CreatedAtDesc.is_after(&record("z", 100), &position));
    }

    #[test]
    fn zero_page_sizes_fail_the_check() {
        assert!(PageSizes::default().check().is_ok());
        for sizes in [PageSizes::uniform(0), PageSizes::new(8, 0), PageSizes::new(0, 4)] {
            assert!(matches!(sizes.check(), Err(ListingError::ZeroPageSize)));
        }
    }

    #[test]
    fn fingerprint_ignores_page_sizes() {
        let a = QuerySpec::new(Filter::HasOffer(true), PageSizes::default());
        let b = QuerySpec::new(Filter::HasOffer(true), PageSizes::uniform(4));
        let c = QuerySpec::new(Filter::ListingType(ListingType::Rent), PageSizes::default());
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
