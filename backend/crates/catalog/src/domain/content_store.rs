//! Content Store trait
//!
//! Content-addressed blob storage. The production implementation is an
//! IPFS node; see `infra::ipfs`.

use axum::body::Bytes;

use crate::domain::value_object::content_id::ContentId;
use crate::error::CatalogResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredContent {
    pub cid: ContentId,
    pub size_bytes: u64,
}

#[trait_variant::make(ContentStore: Send)]
pub trait LocalContentStore {
    /// Store `data` and return its content id
    async fn add(&self, file_name: &str, data: Bytes) -> CatalogResult<StoredContent>;

    /// Fetch content; `ContentNotFound` when the store does not have it
    async fn cat(&self, cid: &ContentId) -> CatalogResult<Bytes>;
}
