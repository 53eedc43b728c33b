//! Listing service - the create, edit, delete and browse flows.
//!
//! Writes are owner-only: the signed-in user creates listings in their own
//! name and may only change or remove listings they own.

use std::sync::Arc;

use crate::auth::AuthProvider;
use crate::config::ListingsConfig;
use crate::contact::{ContactMessage, ListerDirectory};
use crate::error::ListingError;
use crate::feed::{load_home_feed, HomeFeed};
use crate::listing::{ListingDraft, ListingRecord, ValidationError};
use crate::pager::Pager;
use crate::presenter::ListingPresenter;
use crate::query::{QueryBuilder, View};
use crate::store::ListingStore;

pub struct ListingService<S: ?Sized> {
    store: Arc<S>,
    auth: Arc<dyn AuthProvider>,
    builder: QueryBuilder,
    config: ListingsConfig,
}

impl<S> ListingService<S>
where
    S: ListingStore + ?Sized,
{
    pub fn new(store: Arc<S>, auth: Arc<dyn AuthProvider>, config: ListingsConfig) -> Self {
        let builder = QueryBuilder::new(auth.clone(), &config);
        Self {
            store,
            auth,
            builder,
            config,
        }
    }

    pub fn builder(&self) -> &QueryBuilder {
        &self.builder
    }

    pub fn presenter(&self) -> ListingPresenter {
        ListingPresenter::new(self.auth.clone())
    }

    pub fn config(&self) -> &ListingsConfig {
        &self.config
    }

    /// A pager for `view`, not yet loaded.
    pub fn pager(&self, view: View) -> Result<Pager<S>, ListingError> {
        let spec = self.builder.build(view)?;
        Ok(Pager::new(self.store.clone(), spec))
    }

    /// The signed-in user's listings, newest first.
    pub fn my_listings(&self) -> Result<Pager<S>, ListingError> {
        self.pager(View::ByOwner)
    }

    pub async fn home_feed(&self) -> HomeFeed {
        load_home_feed(self.store.as_ref(), &self.builder, &self.config).await
    }

    pub async fn get(&self, id: &str) -> Result<ListingRecord, ListingError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ListingError::NotFound { id: id.to_string() })
    }

    /// Validate and store a new listing owned by the signed-in user.
    pub async fn create(&self, draft: &ListingDraft) -> Result<ListingRecord, ListingError> {
        let user_id = self.signed_in_user()?;
        let new_listing = draft.validate()?;

        let record = self.store.insert(&user_id, new_listing).await?;
        tracing::info!(id = %record.id, owner = %user_id, "listing created");
        Ok(record)
    }

    /// Prefill the edit form for a listing the signed-in user owns.
    pub async fn edit_draft(&self, id: &str) -> Result<ListingDraft, ListingError> {
        let record = self.owned(id).await?;
        Ok(ListingDraft::from_listing(&record.listing))
    }

    /// Replace an owned listing's fields. The discounted price is dropped
    /// unless the offer is on.
    pub async fn update(&self, id: &str, draft: &ListingDraft) -> Result<ListingRecord, ListingError> {
        self.owned(id).await?;
        let new_listing = draft.validate()?;

        let record = self.store.update(id, new_listing).await?;
        tracing::info!(id = %id, "listing updated");
        Ok(record)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ListingError> {
        self.owned(id).await?;

        if !self.store.delete(id).await? {
            return Err(ListingError::NotFound { id: id.to_string() });
        }
        tracing::info!(id = %id, "listing deleted");
        Ok(())
    }

    /// Compose a message from the signed-in user to the listing's owner.
    pub async fn contact_lister<D>(
        &self,
        directory: &D,
        id: &str,
        message: &str,
    ) -> Result<ContactMessage, ListingError>
    where
        D: ListerDirectory + ?Sized,
    {
        let user_id = self.signed_in_user()?;
        let record = self.get(id).await?;

        if record.listing.is_owned_by(&user_id) {
            return Err(ListingError::OwnListing { id: id.to_string() });
        }

        let body = message.trim();
        if body.is_empty() {
            return Err(ValidationError::MissingField("message").into());
        }

        let owner = &record.listing.owner;
        let lister = directory
            .lister(owner)
            .await?
            .ok_or_else(|| ListingError::ListerNotFound {
                user_id: owner.clone(),
            })?;

        tracing::info!(id = %id, from = %user_id, to = %lister.user_id, "lister contacted");
        Ok(ContactMessage {
            listing_id: record.id,
            to_name: lister.name,
            to_email: lister.email,
            subject: record.listing.property_name,
            body: body.to_string(),
        })
    }

    fn signed_in_user(&self) -> Result<String, ListingError> {
        self.auth.current_user().ok_or(ListingError::NotAuthenticated)
    }

    async fn owned(&self, id: &str) -> Result<ListingRecord, ListingError> {
        let user_id = self.signed_in_user()?;
        let record = self.get(id).await?;

        if !record.listing.is_owned_by(&user_id) {
            tracing::warn!(id = %id, user_id = %user_id, "rejected change to listing owned by someone else");
            return Err(ListingError::NotOwner {
                id: id.to_string(),
                user_id,
            });
        }
        Ok(record)
    }
}
