//! Domain Layer

pub mod content_store;
pub mod entity;
pub mod repository;
pub mod value_object;

pub use entity::listing::{Listing, ListingOwner, ListingWithOwner};
pub use repository::ListingRepository;
