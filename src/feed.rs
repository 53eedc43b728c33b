//! Home feed - the landing page's preview sections.

use crate::config::ListingsConfig;
use crate::error::ListingError;
use crate::listing::{ListingRecord, ListingType};
use crate::pager;
use crate::query::{PageSizes, QueryBuilder, View};
use crate::store::QueryListings;

/// One preview section. A failed section keeps its error; the others still
/// render.
#[derive(Debug)]
pub struct FeedSection {
    pub view: View,
    pub listings: Result<Vec<ListingRecord>, ListingError>,
}

impl FeedSection {
    pub fn is_ok(&self) -> bool {
        self.listings.is_ok()
    }

    /// The section's listings, or nothing if it failed to load.
    pub fn records(&self) -> &[ListingRecord] {
        self.listings.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug)]
pub struct HomeFeed {
    pub offers: FeedSection,
    pub rentals: FeedSection,
    pub sales: FeedSection,
}

impl HomeFeed {
    pub fn sections(&self) -> [&FeedSection; 3] {
        [&self.offers, &self.rentals, &self.sales]
    }
}

/// Load recent offers, places for rent and places for sale concurrently.
///
/// Offers show a full first page; the rent and sale previews show
/// `preview_page_size` records each.
pub async fn load_home_feed<S>(store: &S, builder: &QueryBuilder, config: &ListingsConfig) -> HomeFeed
where
    S: QueryListings + ?Sized,
{
    let (offers, rentals, sales) = tokio::join!(
        load_section(store, builder, View::Offers, config.initial_page_size),
        load_section(store, builder, View::ByType(ListingType::Rent), config.preview_page_size),
        load_section(store, builder, View::ByType(ListingType::Sale), config.preview_page_size),
    );

    HomeFeed {
        offers,
        rentals,
        sales,
    }
}

async fn load_section<S>(store: &S, builder: &QueryBuilder, view: View, size: usize) -> FeedSection
where
    S: QueryListings + ?Sized,
{
    let listings = match builder.build_with_sizes(view.clone(), PageSizes::uniform(size)) {
        Ok(spec) => pager::fetch(store, &spec).await.map(|page| page.records),
        Err(err) => Err(err),
    };

    if let Err(err) = &listings {
        tracing::warn!(view = %view, error = %err, "home feed section failed");
    }

    FeedSection { view, listings }
}
