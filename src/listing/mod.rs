//! Listings - the property records browsed, created and edited by users.
//!
//! A [`Listing`] is the stored document; a [`ListingRecord`] pairs it with the
//! store-generated ID. New listings are produced by validating a
//! [`ListingDraft`], which keeps form state as typed per-field updates.

mod draft;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use draft::{ListingDraft, NewListing, ValidationError, MAX_IMAGES};

/// Whether a listing is offered for rent or for sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Rent,
    Sale,
}

impl ListingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Rent => "rent",
            ListingType::Sale => "sale",
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rent" => Ok(ListingType::Rent),
            "sale" => Ok(ListingType::Sale),
            other => Err(format!("unknown listing type: {}", other)),
        }
    }
}

/// A stored property listing.
///
/// Field names serialize in the document shape the listings collection uses
/// (`listingType`, `imgUrls`, `userRef`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub listing_type: ListingType,
    pub property_name: String,
    pub address: String,
    pub description: String,
    pub bed: u32,
    pub bath: u32,
    /// Price in the smallest currency unit.
    pub price: u64,
    pub offer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<u64>,
    pub parking: bool,
    pub furnished: bool,
    #[serde(rename = "imgUrls")]
    pub image_urls: Vec<String>,
    #[serde(rename = "userRef")]
    pub owner: String,
    /// Assigned by the store when the listing is created.
    pub created_at: DateTime<Utc>,
}

impl Listing {
    /// Returns true if `user_id` is the listing's owner.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner == user_id
    }
}

/// A listing together with its store-generated ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub id: String,
    pub listing: Listing,
}

impl ListingRecord {
    pub fn new(id: impl Into<String>, listing: Listing) -> Self {
        Self {
            id: id.into(),
            listing,
        }
    }
}
