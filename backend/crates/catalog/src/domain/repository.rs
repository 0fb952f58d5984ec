//! Listing Repository trait

use kernel::AccountAddress;
use kernel::id::ListingId;

use crate::domain::entity::listing::{Listing, ListingWithOwner};
use crate::error::CatalogResult;

#[trait_variant::make(ListingRepository: Send)]
pub trait LocalListingRepository {
    /// Fails with `DuplicateListing` when the owner already listed this content
    async fn create(&self, listing: &Listing) -> CatalogResult<()>;

    async fn find_by_id(&self, listing_id: ListingId) -> CatalogResult<Option<Listing>>;

    async fn find_with_owner(&self, listing_id: ListingId)
    -> CatalogResult<Option<ListingWithOwner>>;

    /// Newest first; `owner` narrows to one seller account
    async fn list(&self, owner: Option<&AccountAddress>) -> CatalogResult<Vec<ListingWithOwner>>;
}
