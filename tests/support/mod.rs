#![allow(dead_code)]

pub mod probe_store;

use chrono::{DateTime, Utc};
use estate_listings::{InMemoryListingStore, Listing, ListingRecord, ListingType};

pub use probe_store::ProbeStore;

/// Install a fmt subscriber once; honours RUST_LOG.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
}

pub fn listing(listing_type: ListingType, offer: bool, owner: &str, created_secs: i64) -> Listing {
    Listing {
        listing_type,
        property_name: format!("{} #{}", listing_type, created_secs),
        address: format!("{} Harbour Street", created_secs),
        description: "Light-filled rooms close to the park".into(),
        bed: 2,
        bath: 1,
        price: 150_000,
        offer,
        discounted_price: offer.then_some(120_000),
        parking: true,
        furnished: false,
        image_urls: vec![format!("https://img.example/{}.jpg", created_secs)],
        owner: owner.into(),
        created_at: at(created_secs),
    }
}

/// Seed `count` listings created one second apart, IDs `{prefix}-{i}`.
pub fn seed(
    store: &InMemoryListingStore,
    prefix: &str,
    count: usize,
    listing_type: ListingType,
    offer: bool,
    owner: &str,
) -> Vec<String> {
    (0..count)
        .map(|i| {
            let id = format!("{}-{:02}", prefix, i);
            let secs = i as i64 + offset(prefix);
            store
                .seed(ListingRecord::new(id.clone(), listing(listing_type, offer, owner, secs)))
                .unwrap();
            id
        })
        .collect()
}

/// Spread different prefixes over different time ranges.
fn offset(prefix: &str) -> i64 {
    prefix.bytes().map(i64::from).sum::<i64>() * 100
}

pub fn ids(records: &[ListingRecord]) -> Vec<&str> {
    records.iter().map(|record| record.id.as_str()).collect()
}
