//! Catalog Router

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::domain::content_store::ContentStore;
use crate::domain::repository::ListingRepository;
use crate::presentation::handlers::{self, CatalogAppState};

/// Create the Catalog router
///
/// Routes expect a [`identity::CurrentTrader`]; the caller layers
/// `identity::require_trader` on top.
pub fn catalog_router<R, S>(state: CatalogAppState<R, S>) -> Router
where
    R: ListingRepository + Send + Sync + 'static,
    S: ContentStore + Send + Sync + 'static,
{
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/listing/{id}", get(handlers::get_listing::<R, S>))
        .route("/listings", get(handlers::list_listings::<R, S>))
        .route(
            "/seller/upload",
            post(handlers::upload::<R, S>).layer(upload_limit),
        )
        .route("/seller/download", get(handlers::download::<R, S>))
        .with_state(state)
}
