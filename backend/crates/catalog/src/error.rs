//! Catalog Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Listing not found")]
    ListingNotFound,

    #[error("Content not found")]
    ContentNotFound,

    #[error("Invalid content id: {0}")]
    InvalidContentId(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Uploaded file is empty")]
    EmptyUpload,

    #[error("Invalid listing field: {0}")]
    InvalidField(String),

    #[error("Invalid account: {0}")]
    InvalidAccount(String),

    /// Same content listed twice by the same owner
    #[error("Content is already listed by this trader")]
    DuplicateListing,

    #[error("Content store unavailable: {0}")]
    ContentStore(String),

    #[error("Timed out waiting for the content store")]
    ContentStoreTimeout,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::ListingNotFound | CatalogError::ContentNotFound => ErrorKind::NotFound,
            CatalogError::InvalidContentId(_)
            | CatalogError::InvalidPrice(_)
            | CatalogError::EmptyUpload
            | CatalogError::InvalidField(_)
            | CatalogError::InvalidAccount(_) => ErrorKind::BadRequest,
            CatalogError::DuplicateListing => ErrorKind::Conflict,
            CatalogError::ContentStore(_) => ErrorKind::BadGateway,
            CatalogError::ContentStoreTimeout => ErrorKind::GatewayTimeout,
            CatalogError::Database(_) | CatalogError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            CatalogError::Database(_) | CatalogError::Internal(_) => {
                AppError::new(self.kind(), "Internal server error")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            CatalogError::Database(e) => {
                tracing::error!(error = %e, "Catalog database error");
            }
            CatalogError::Internal(msg) => {
                tracing::error!(message = %msg, "Catalog internal error");
            }
            CatalogError::ContentStore(msg) => {
                tracing::error!(error = %msg, "Content store failure");
            }
            CatalogError::ContentStoreTimeout => tracing::warn!("Content store timed out"),
            _ => tracing::debug!(error = %self, "Catalog error"),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogError::ContentStoreTimeout
        } else {
            CatalogError::ContentStore(err.to_string())
        }
    }
}

impl From<kernel::AccountAddressError> for CatalogError {
    fn from(err: kernel::AccountAddressError) -> Self {
        CatalogError::InvalidAccount(err.to_string())
    }
}

impl From<kernel::AmountError> for CatalogError {
    fn from(err: kernel::AmountError) -> Self {
        CatalogError::InvalidPrice(err.to_string())
    }
}
