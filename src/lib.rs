mod auth;
mod config;
mod contact;
mod error;
mod feed;
mod images;
mod listing;
pub mod pager;
mod presenter;
mod query;
mod service;
mod store;

pub use auth::{AuthChange, AuthProvider, AuthStatus, InMemoryAuthProvider, AUTH_STATE_CHANGED};
pub use config::{
    ConfigError, ListingsConfig, INITIAL_PAGE_SIZE_VAR, NEXT_PAGE_SIZE_VAR, PREVIEW_PAGE_SIZE_VAR,
};
pub use contact::{ContactMessage, InMemoryListerDirectory, Lister, ListerDirectory};
pub use error::ListingError;
pub use feed::{load_home_feed, FeedSection, HomeFeed};
pub use images::{upload_all, ImageError, ImageStore, InMemoryImageStore};
pub use listing::{
    Listing, ListingDraft, ListingRecord, ListingType, NewListing, ValidationError, MAX_IMAGES,
};
pub use pager::{Page, Pager};
pub use presenter::{display_price, price_label, relative_time, ListingCard, ListingPresenter};
pub use query::{
    CursorPosition, Filter, PageCursor, PageSizes, QueryBuilder, QuerySpec, Sort, View,
};
pub use service::ListingService;
pub use store::{
    GetListing, InMemoryListingStore, ListingStore, QueryListings, StoreBatch, StoreError,
    StoreQuery, WriteListings,
};
