use std::sync::Arc;

use super::{Filter, PageSizes, QuerySpec, View};
use crate::auth::AuthProvider;
use crate::config::ListingsConfig;
use crate::error::ListingError;

/// Maps views to query specs.
///
/// Only the owner views consult the auth provider; every other view maps the
/// same way whoever is signed in. The owner filter is always the signed-in
/// user: `by-owner:<id>` must name that user.
#[derive(Clone)]
pub struct QueryBuilder {
    auth: Arc<dyn AuthProvider>,
    page_sizes: PageSizes,
}

impl QueryBuilder {
    pub fn new(auth: Arc<dyn AuthProvider>, config: &ListingsConfig) -> Self {
        Self {
            auth,
            page_sizes: config.page_sizes(),
        }
    }

    /// Build the spec for `view` with the configured page sizes.
    ///
    /// Fails with `ZeroPageSize` if either size is zero.
    pub fn build(&self, view: View) -> Result<QuerySpec, ListingError> {
        self.build_with_sizes(view, self.page_sizes)
    }

    /// Parse a view name (`offers`, `by-type:rent`, `by-type:sale`,
    /// `by-owner`) and build its spec.
    pub fn build_named(&self, name: &str) -> Result<QuerySpec, ListingError> {
        self.build(name.parse()?)
    }

    pub fn build_with_sizes(
        &self,
        view: View,
        page_sizes: PageSizes,
    ) -> Result<QuerySpec, ListingError> {
        page_sizes.check()?;

        let filter = match view {
            View::Offers => Filter::HasOffer(true),
            View::ByType(listing_type) => Filter::ListingType(listing_type),
            View::ByOwner => Filter::Owner(self.signed_in_user()?),
            View::OwnedBy(requested) => {
                let user_id = self.signed_in_user()?;
                if requested != user_id {
                    tracing::warn!(requested = %requested, user_id = %user_id, "owner view for another user");
                    return Err(ListingError::OwnerMismatch { requested, user_id });
                }
                Filter::Owner(user_id)
            }
        };

        Ok(QuerySpec::new(filter, page_sizes))
    }

    pub fn page_sizes(&self) -> PageSizes {
        self.page_sizes
    }

    fn signed_in_user(&self) -> Result<String, ListingError> {
        self.auth.current_user().ok_or(ListingError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::InMemoryAuthProvider;
    use crate::listing::ListingType;

    fn builder(auth: InMemoryAuthProvider) -> QueryBuilder {
        QueryBuilder::new(Arc::new(auth), &ListingsConfig::default())
    }

    #[test]
    fn public_views_ignore_auth_state() {
        let anonymous = builder(InMemoryAuthProvider::anonymous());
        let signed_in = builder(InMemoryAuthProvider::signed_in("user-1"));

        for view in [
            View::Offers,
            View::ByType(ListingType::Rent),
            View::ByType(ListingType::Sale),
        ] {
            assert_eq!(
                anonymous.build(view.clone()).unwrap(),
                signed_in.build(view).unwrap()
            );
        }
    }

    #[test]
    fn maps_views_to_filters() {
        let builder = builder(InMemoryAuthProvider::signed_in("user-1"));

        let offers = builder.build_named("offers").unwrap();
        assert_eq!(offers.filter, Filter::HasOffer(true));
        assert_eq!(offers.page_sizes, PageSizes::new(8, 4));

        let rentals = builder.build_named("by-type:rent").unwrap();
        assert_eq!(rentals.filter, Filter::ListingType(ListingType::Rent));

        let mine = builder.build_named("by-owner").unwrap();
        assert_eq!(mine.filter, Filter::Owner("user-1".into()));
    }

    #[test]
    fn owner_view_requires_sign_in() {
        let builder = builder(InMemoryAuthProvider::anonymous());
        let err = builder.build(View::ByOwner).unwrap_err();
        assert!(err.requires_sign_in());
    }

    #[test]
    fn named_owner_must_be_the_signed_in_user() {
        let builder = builder(InMemoryAuthProvider::signed_in("user-1"));

        let mine = builder.build_named("by-owner:user-1").unwrap();
        assert_eq!(mine.filter, Filter::Owner("user-1".into()));
        assert_eq!(mine, builder.build(View::ByOwner).unwrap());

        assert!(matches!(
            builder.build_named("by-owner:user-2"),
            Err(ListingError::OwnerMismatch { ref requested, ref user_id })
                if requested == "user-2" && user_id == "user-1"
        ));
    }

    #[test]
    fn named_owner_without_sign_in_is_not_authenticated() {
        let builder = builder(InMemoryAuthProvider::anonymous());
        let err = builder.build_named("by-owner:user-1").unwrap_err();
        assert!(err.requires_sign_in());
    }

    #[test]
    fn zero_page_sizes_are_rejected() {
        let builder = builder(InMemoryAuthProvider::anonymous());
        assert!(matches!(
            builder.build_with_sizes(View::Offers, PageSizes::uniform(0)),
            Err(ListingError::ZeroPageSize)
        ));
        assert!(matches!(
            builder.build_with_sizes(View::Offers, PageSizes::new(8, 0)),
            Err(ListingError::ZeroPageSize)
        ));
    }

    #[test]
    fn owner_view_follows_auth_changes() {
        let auth = Arc::new(InMemoryAuthProvider::anonymous());
        let builder = QueryBuilder::new(auth.clone(), &ListingsConfig::default());
        assert!(builder.build(View::ByOwner).is_err());

        auth.sign_in("user-2");
        assert_eq!(
            builder.build(View::ByOwner).unwrap().filter,
            Filter::Owner("user-2".into())
        );
    }
}
