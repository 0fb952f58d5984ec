//! Upload Listing Use Case

use std::sync::Arc;

use axum::body::Bytes;
use kernel::TokenAmount;
use kernel::id::TraderId;

use crate::domain::content_store::ContentStore;
use crate::domain::entity::listing::Listing;
use crate::domain::repository::ListingRepository;
use crate::domain::value_object::listing_name;
use crate::error::{CatalogError, CatalogResult};

pub struct UploadListingInput {
    pub owner_id: TraderId,
    pub price: u64,
    /// Defaults to the content id
    pub name: Option<String>,
    pub category: Option<String>,
    pub data: Bytes,
}

pub struct UploadListingUseCase<R, S>
where
    R: ListingRepository,
    S: ContentStore,
{
    repo: Arc<R>,
    store: Arc<S>,
}

impl<R, S> UploadListingUseCase<R, S>
where
    R: ListingRepository + Sync,
    S: ContentStore + Sync,
{
    pub fn new(repo: Arc<R>, store: Arc<S>) -> Self {
        Self { repo, store }
    }

    pub async fn execute(&self, input: UploadListingInput) -> CatalogResult<Listing> {
        // Validate everything before touching the content store
        if input.data.is_empty() {
            return Err(CatalogError::EmptyUpload);
        }
        let price = TokenAmount::new(input.price)?;
        if price.is_zero() {
            return Err(CatalogError::InvalidPrice("price must be positive".to_string()));
        }
        let name = input
            .name
            .as_deref()
            .map(listing_name::listing_name)
            .transpose()?;
        let category = input
            .category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .map(listing_name::category)
            .transpose()?;

        let file_name = name.clone().unwrap_or_else(|| "upload".to_string());
        let stored = self.store.add(&file_name, input.data).await?;

        let listing = Listing::new(
            stored.cid.clone(),
            stored.size_bytes,
            name.unwrap_or_else(|| stored.cid.to_string()),
            price,
            input.owner_id,
            category,
        );
        self.repo.create(&listing).await?;

        tracing::info!(
            listing_id = %listing.listing_id,
            owner_id = %listing.owner_id,
            cid = %listing.cid,
            size_bytes = listing.size_bytes,
            "Listing created"
        );

        Ok(listing)
    }
}
