use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Listing, ListingType};

/// Maximum number of images a listing may carry.
pub const MAX_IMAGES: usize = 6;

/// Reasons a draft cannot be turned into a listing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("price must be greater than zero")]
    ZeroPrice,
    #[error("an offer needs a discounted price")]
    MissingDiscount,
    #[error("discounted price {discounted} must be lower than price {price}")]
    DiscountNotBelowPrice { price: u64, discounted: u64 },
    #[error("a listing needs between 1 and 6 images, got {count}")]
    ImageCount { count: usize },
}

/// A validated listing, ready to be written by its owner.
///
/// Owner and creation timestamp are not part of it: the service supplies the
/// signed-in user and the store assigns the timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub listing_type: ListingType,
    pub property_name: String,
    pub address: String,
    pub description: String,
    pub bed: u32,
    pub bath: u32,
    pub price: u64,
    pub offer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<u64>,
    pub parking: bool,
    pub furnished: bool,
    #[serde(rename = "imgUrls")]
    pub image_urls: Vec<String>,
}

impl NewListing {
    pub fn into_listing(self, owner: impl Into<String>, created_at: DateTime<Utc>) -> Listing {
        Listing {
            listing_type: self.listing_type,
            property_name: self.property_name,
            address: self.address,
            description: self.description,
            bed: self.bed,
            bath: self.bath,
            price: self.price,
            offer: self.offer,
            discounted_price: self.discounted_price,
            parking: self.parking,
            furnished: self.furnished,
            image_urls: self.image_urls,
            owner: owner.into(),
            created_at,
        }
    }
}

/// Form state for creating or editing a listing.
///
/// Each field has its own setter so that toggling one field can never
/// clobber another; switching the offer off drops the discounted price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDraft {
    listing_type: ListingType,
    property_name: String,
    address: String,
    description: String,
    bed: u32,
    bath: u32,
    price: u64,
    offer: bool,
    discounted_price: Option<u64>,
    parking: bool,
    furnished: bool,
    image_urls: Vec<String>,
}

impl Default for ListingDraft {
    fn default() -> Self {
        Self {
            listing_type: ListingType::Sale,
            property_name: String::new(),
            address: String::new(),
            description: String::new(),
            bed: 0,
            bath: 0,
            price: 0,
            offer: false,
            discounted_price: None,
            parking: false,
            furnished: false,
            image_urls: Vec::new(),
        }
    }
}

impl ListingDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill a draft from a stored listing (the edit form).
    pub fn from_listing(listing: &Listing) -> Self {
        Self {
            listing_type: listing.listing_type,
            property_name: listing.property_name.clone(),
            address: listing.address.clone(),
            description: listing.description.clone(),
            bed: listing.bed,
            bath: listing.bath,
            price: listing.price,
            offer: listing.offer,
            discounted_price: listing.discounted_price.filter(|_| listing.offer),
            parking: listing.parking,
            furnished: listing.furnished,
            image_urls: listing.image_urls.clone(),
        }
    }

    pub fn set_listing_type(&mut self, listing_type: ListingType) -> &mut Self {
        self.listing_type = listing_type;
        self
    }

    pub fn set_property_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.property_name = name.into();
        self
    }

    pub fn set_address(&mut self, address: impl Into<String>) -> &mut Self {
        self.address = address.into();
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    pub fn set_bed(&mut self, bed: u32) -> &mut Self {
        self.bed = bed;
        self
    }

    pub fn set_bath(&mut self, bath: u32) -> &mut Self {
        self.bath = bath;
        self
    }

    pub fn set_price(&mut self, price: u64) -> &mut Self {
        self.price = price;
        self
    }

    /// Toggle the offer. Turning it off discards the discounted price.
    pub fn set_offer(&mut self, offer: bool) -> &mut Self {
        self.offer = offer;
        if !offer {
            self.discounted_price = None;
        }
        self
    }

    /// Set the discounted price. Ignored unless the offer is on.
    pub fn set_discounted_price(&mut self, discounted: u64) -> &mut Self {
        if self.offer {
            self.discounted_price = Some(discounted);
        }
        self
    }

    pub fn set_parking(&mut self, parking: bool) -> &mut Self {
        self.parking = parking;
        self
    }

    pub fn set_furnished(&mut self, furnished: bool) -> &mut Self {
        self.furnished = furnished;
        self
    }

    pub fn set_image_urls(&mut self, urls: Vec<String>) -> &mut Self {
        self.image_urls = urls;
        self
    }

    pub fn push_image_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.image_urls.push(url.into());
        self
    }

    pub fn listing_type(&self) -> ListingType {
        self.listing_type
    }

    pub fn offer(&self) -> bool {
        self.offer
    }

    pub fn discounted_price(&self) -> Option<u64> {
        self.discounted_price
    }

    pub fn image_urls(&self) -> &[String] {
        &self.image_urls
    }

    /// Check the draft and produce a [`NewListing`].
    pub fn validate(&self) -> Result<NewListing, ValidationError> {
        let property_name = required("property name", &self.property_name)?;
        let address = required("address", &self.address)?;
        let description = required("description", &self.description)?;

        if self.price == 0 {
            return Err(ValidationError::ZeroPrice);
        }

        let discounted_price = if self.offer {
            let discounted = self.discounted_price.ok_or(ValidationError::MissingDiscount)?;
            if discounted == 0 || discounted >= self.price {
                return Err(ValidationError::DiscountNotBelowPrice {
                    price: self.price,
                    discounted,
                });
            }
            Some(discounted)
        } else {
            None
        };

        let count = self.image_urls.len();
        if count == 0 || count > MAX_IMAGES {
            return Err(ValidationError::ImageCount { count });
        }

        Ok(NewListing {
            listing_type: self.listing_type,
            property_name,
            address,
            description,
            bed: self.bed,
            bath: self.bath,
            price: self.price,
            offer: self.offer,
            discounted_price,
            parking: self.parking,
            furnished: self.furnished,
            image_urls: self.image_urls.clone(),
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}
