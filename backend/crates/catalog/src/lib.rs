//! Catalog Store
//!
//! Listings of content-addressed files offered for sale:
//! - upload (content store `add` + listing record)
//! - browse / single lookup (public views never expose the content id)
//! - download by content id

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


pub use application::config::CatalogConfig;
pub use domain::content_store::{ContentStore, LocalContentStore, StoredContent};
pub use domain::entity::listing::{Listing, ListingOwner, ListingWithOwner};
pub use domain::repository::{ListingRepository, LocalListingRepository};
pub use domain::value_object::content_id::ContentId;
pub use error::{CatalogError, CatalogResult};
pub use infra::ipfs::IpfsContentStore;
pub use infra::postgres::PgListingRepository;
pub use presentation::handlers::CatalogAppState;
pub use presentation::router::catalog_router;
