//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use identity::CurrentTrader;
use kernel::id::ListingId;
use uuid::Uuid;

use crate::application::config::CatalogConfig;
use crate::application::{
    BrowseListingsUseCase, DownloadContentUseCase, UploadListingInput, UploadListingUseCase,
};
use crate::domain::content_store::ContentStore;
use crate::domain::entity::listing::ListingOwner;
use crate::domain::repository::ListingRepository;
use crate::error::{CatalogError, CatalogResult};
use crate::presentation::dto::{DownloadQuery, ListingResponse, ListingsQuery, UploadQuery};

pub struct CatalogAppState<R, S>
where
    R: ListingRepository + Send + Sync + 'static,
    S: ContentStore + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub store: Arc<S>,
    pub config: Arc<CatalogConfig>,
}

impl<R, S> CatalogAppState<R, S>
where
    R: ListingRepository + Send + Sync + 'static,
    S: ContentStore + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, store: Arc<S>, config: CatalogConfig) -> Self {
        Self {
            repo,
            store,
            config: Arc::new(config),
        }
    }
}

impl<R, S> Clone for CatalogAppState<R, S>
where
    R: ListingRepository + Send + Sync + 'static,
    S: ContentStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            store: self.store.clone(),
            config: self.config.clone(),
        }
    }
}

/// GET /listing/{id}
pub async fn get_listing<R, S>(
    State(state): State<CatalogAppState<R, S>>,
    Path(id): Path<String>,
) -> CatalogResult<Json<ListingResponse>>
where
    R: ListingRepository + Send + Sync + 'static,
    S: ContentStore + Send + Sync + 'static,
{
    // An unparseable id cannot name any listing
    let listing_id = Uuid::parse_str(&id)
        .map(ListingId::from_uuid)
        .map_err(|_| CatalogError::ListingNotFound)?;

    let view = BrowseListingsUseCase::new(state.repo.clone())
        .get(listing_id)
        .await?;
    Ok(Json(ListingResponse::public(&view)))
}

/// GET /listings?owner=
pub async fn list_listings<R, S>(
    State(state): State<CatalogAppState<R, S>>,
    Query(query): Query<ListingsQuery>,
) -> CatalogResult<Json<Vec<ListingResponse>>>
where
    R: ListingRepository + Send + Sync + 'static,
    S: ContentStore + Send + Sync + 'static,
{
    let views = BrowseListingsUseCase::new(state.repo.clone())
        .list(query.owner.as_deref())
        .await?;
    Ok(Json(views.iter().map(ListingResponse::public).collect()))
}

/// POST /seller/upload?price=&name=&category=
pub async fn upload<R, S>(
    State(state): State<CatalogAppState<R, S>>,
    current: CurrentTrader,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> CatalogResult<Json<ListingResponse>>
where
    R: ListingRepository + Send + Sync + 'static,
    S: ContentStore + Send + Sync + 'static,
{
    let listing = UploadListingUseCase::new(state.repo.clone(), state.store.clone())
        .execute(UploadListingInput {
            owner_id: current.trader_id,
            price: query.price,
            name: query.name,
            category: query.category,
            data: body,
        })
        .await?;

    let owner = ListingOwner {
        trader_id: current.trader_id,
        name: current.name,
        account: current.account,
    };
    Ok(Json(ListingResponse::owned(&listing, &owner)))
}

/// GET /seller/download?cid=
pub async fn download<R, S>(
    State(state): State<CatalogAppState<R, S>>,
    Query(query): Query<DownloadQuery>,
) -> CatalogResult<impl IntoResponse>
where
    R: ListingRepository + Send + Sync + 'static,
    S: ContentStore + Send + Sync + 'static,
{
    let (cid, data) = DownloadContentUseCase::new(state.store.clone())
        .execute(&query.cid)
        .await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{cid}\""),
            ),
        ],
        data,
    ))
}
