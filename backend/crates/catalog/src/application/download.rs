//! Download Content Use Case

use std::sync::Arc;

use axum::body::Bytes;

use crate::domain::content_store::ContentStore;
use crate::domain::value_object::content_id::ContentId;
use crate::error::CatalogResult;

pub struct DownloadContentUseCase<S>
where
    S: ContentStore,
{
    store: Arc<S>,
}

impl<S> DownloadContentUseCase<S>
where
    S: ContentStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, raw_cid: &str) -> CatalogResult<(ContentId, Bytes)> {
        let cid = ContentId::parse(raw_cid)?;
        let data = self.store.cat(&cid).await?;
        tracing::debug!(cid = %cid, size_bytes = data.len(), "Content fetched");
        Ok((cid, data))
    }
}
