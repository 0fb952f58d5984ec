//! Application Layer

pub mod browse;
pub mod config;
pub mod download;
pub mod upload;

pub use browse::BrowseListingsUseCase;
pub use config::CatalogConfig;
pub use download::DownloadContentUseCase;
pub use upload::{UploadListingInput, UploadListingUseCase};
