//! Presenter - turns listing records into cards for rendering.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::auth::AuthProvider;
use crate::listing::{Listing, ListingRecord, ListingType};

/// Everything a listing card shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCard {
    pub id: String,
    pub title: String,
    pub address: String,
    pub listing_type: ListingType,
    pub cover_image: Option<String>,
    /// The price the viewer pays, in the smallest currency unit.
    pub display_price: u64,
    /// e.g. `$800 / month`
    pub price_label: String,
    /// The undiscounted price, shown struck through when an offer applies.
    pub original_price_label: Option<String>,
    pub bed_label: Option<String>,
    pub bath_label: Option<String>,
    pub parking: bool,
    pub furnished: bool,
    /// e.g. `3 days ago`
    pub posted: String,
    pub is_owner: bool,
    /// Owner sees edit and delete controls.
    pub can_manage: bool,
    /// Signed-in non-owners may contact the lister.
    pub can_contact: bool,
}

/// The price a viewer pays: the discounted price only while an offer is on.
pub fn display_price(listing: &Listing) -> u64 {
    match (listing.offer, listing.discounted_price) {
        (true, Some(discounted)) => discounted,
        _ => listing.price,
    }
}

/// Maps records to [`ListingCard`]s for the current viewer.
#[derive(Clone)]
pub struct ListingPresenter {
    auth: Arc<dyn AuthProvider>,
}

impl ListingPresenter {
    pub fn new(auth: Arc<dyn AuthProvider>) -> Self {
        Self { auth }
    }

    pub fn present(&self, record: &ListingRecord) -> ListingCard {
        self.present_at(record, Utc::now())
    }

    pub fn present_all(&self, records: &[ListingRecord]) -> Vec<ListingCard> {
        let now = Utc::now();
        records
            .iter()
            .map(|record| self.present_at(record, now))
            .collect()
    }

    /// Like [`ListingPresenter::present`] with an explicit "now" for the
    /// relative-time label.
    pub fn present_at(&self, record: &ListingRecord, now: DateTime<Utc>) -> ListingCard {
        let listing = &record.listing;
        let viewer = self.auth.current_user();
        let is_owner = viewer
            .as_deref()
            .map_or(false, |user_id| listing.is_owned_by(user_id));

        let display = display_price(listing);
        let discounted = display != listing.price;

        ListingCard {
            id: record.id.clone(),
            title: listing.property_name.clone(),
            address: listing.address.clone(),
            listing_type: listing.listing_type,
            cover_image: listing.image_urls.first().cloned(),
            display_price: display,
            price_label: price_label(display, listing.listing_type),
            original_price_label: discounted.then(|| price_label(listing.price, listing.listing_type)),
            bed_label: count_label(listing.bed, "bedroom"),
            bath_label: count_label(listing.bath, "bathroom"),
            parking: listing.parking,
            furnished: listing.furnished,
            posted: relative_time(listing.created_at, now),
            is_owner,
            can_manage: is_owner,
            can_contact: viewer.is_some() && !is_owner,
        }
    }
}

/// `$1,250` for sales, `$1,250 / month` for rentals.
pub fn price_label(amount: u64, listing_type: ListingType) -> String {
    let amount = format_amount(amount);
    match listing_type {
        ListingType::Rent => format!("{} / month", amount),
        ListingType::Sale => amount,
    }
}

/// Format an amount in the smallest currency unit as dollars, dropping the
/// cents when there are none.
fn format_amount(amount: u64) -> String {
    let dollars = group_thousands(amount / 100);
    match amount % 100 {
        0 => format!("${}", dollars),
        cents => format!("${}.{:02}", dollars, cents),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

fn count_label(count: u32, noun: &str) -> Option<String> {
    match count {
        0 => None,
        1 => Some(format!("1 {}", noun)),
        n => Some(format!("{} {}s", n, noun)),
    }
}

/// Human "time ago" label, e.g. `a few seconds ago`, `5 minutes ago`,
/// `a month ago`. Timestamps in the future read as `a few seconds ago`.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds().max(0) as f64;
    let minutes = seconds / 60.0;
    let hours = minutes / 60.0;
    let days = hours / 24.0;

    let phrase = if seconds < 45.0 {
        "a few seconds".to_string()
    } else if seconds < 90.0 {
        "a minute".to_string()
    } else if minutes < 45.0 {
        format!("{} minutes", minutes.round())
    } else if minutes < 90.0 {
        "an hour".to_string()
    } else if hours < 22.0 {
        format!("{} hours", hours.round())
    } else if hours < 36.0 {
        "a day".to_string()
    } else if days < 26.0 {
        format!("{} days", days.round())
    } else if days < 45.0 {
        "a month".to_string()
    } else if days < 320.0 {
        format!("{} months", (days / 30.0).round().max(2.0))
    } else if days < 548.0 {
        "a year".to_string()
    } else {
        format!("{} years", (days / 365.0).round().max(2.0))
    };

    format!("{} ago", phrase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::InMemoryAuthProvider;
    use chrono::Duration;

    fn record(owner: &str, price: u64, offer: bool, discounted: Option<u64>) -> ListingRecord {
        ListingRecord::new(
            "listing-1",
            Listing {
                listing_type: ListingType::Rent,
                property_name: "Garden Flat".into(),
                address: "9 Elm Row".into(),
                description: "Quiet".into(),
                bed: 3,
                bath: 1,
                price,
                offer,
                discounted_price: discounted,
                parking: true,
                furnished: false,
                image_urls: vec!["https://img/a.png".into(), "https://img/b.png".into()],
                owner: owner.into(),
                created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            },
        )
    }

    fn presenter(auth: InMemoryAuthProvider) -> ListingPresenter {
        ListingPresenter::new(Arc::new(auth))
    }

    #[test]
    fn offer_price_applies_only_with_offer() {
        let with_offer = record("owner", 1000, true, Some(800));
        assert_eq!(display_price(&with_offer.listing), 800);

        let stray_discount = record("owner", 1000, false, Some(800));
        assert_eq!(display_price(&stray_discount.listing), 1000);

        let offer_without_discount = record("owner", 1000, true, None);
        assert_eq!(display_price(&offer_without_discount.listing), 1000);
    }

    #[test]
    fn card_labels() {
        let card = presenter(InMemoryAuthProvider::anonymous())
            .present(&record("owner", 250_000, true, Some(199_950)));

        assert_eq!(card.display_price, 199_950);
        assert_eq!(card.price_label, "$1,999.50 / month");
        assert_eq!(card.original_price_label.as_deref(), Some("$2,500 / month"));
        assert_eq!(card.bed_label.as_deref(), Some("3 bedrooms"));
        assert_eq!(card.bath_label.as_deref(), Some("1 bathroom"));
        assert_eq!(card.cover_image.as_deref(), Some("https://img/a.png"));
    }

    #[test]
    fn ownership_drives_controls() {
        let listing = record("user-1", 1000, false, None);

        let owner = presenter(InMemoryAuthProvider::signed_in("user-1")).present(&listing);
        assert!(owner.is_owner && owner.can_manage && !owner.can_contact);

        let visitor = presenter(InMemoryAuthProvider::signed_in("user-2")).present(&listing);
        assert!(!visitor.is_owner && !visitor.can_manage && visitor.can_contact);

        let anonymous = presenter(InMemoryAuthProvider::anonymous()).present(&listing);
        assert!(!anonymous.is_owner && !anonymous.can_contact);
    }

    #[test]
    fn relative_time_labels() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let cases = [
            (Duration::seconds(10), "a few seconds ago"),
            (Duration::seconds(60), "a minute ago"),
            (Duration::minutes(5), "5 minutes ago"),
            (Duration::minutes(60), "an hour ago"),
            (Duration::hours(5), "5 hours ago"),
            (Duration::hours(24), "a day ago"),
            (Duration::days(3), "3 days ago"),
            (Duration::days(30), "a month ago"),
            (Duration::days(90), "3 months ago"),
            (Duration::days(400), "a year ago"),
            (Duration::days(800), "2 years ago"),
            (Duration::seconds(-30), "a few seconds ago"),
        ];

        for (age, expected) in cases {
            assert_eq!(relative_time(now - age, now), expected, "age {:?}", age);
        }
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }
}
