//! Browse Listings Use Case

use std::sync::Arc;

use kernel::AccountAddress;
use kernel::id::ListingId;

use crate::domain::entity::listing::ListingWithOwner;
use crate::domain::repository::ListingRepository;
use crate::error::{CatalogError, CatalogResult};

pub struct BrowseListingsUseCase<R>
where
    R: ListingRepository,
{
    repo: Arc<R>,
}

impl<R> BrowseListingsUseCase<R>
where
    R: ListingRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, listing_id: ListingId) -> CatalogResult<ListingWithOwner> {
        self.repo
            .find_with_owner(listing_id)
            .await?
            .ok_or(CatalogError::ListingNotFound)
    }

    pub async fn list(&self, owner: Option<&str>) -> CatalogResult<Vec<ListingWithOwner>> {
        let owner = owner.map(AccountAddress::parse).transpose()?;
        self.repo.list(owner.as_ref()).await
    }
}
