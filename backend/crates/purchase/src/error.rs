//! Purchase Error Types
//!
//! Collaborator errors (identity, catalog, ledger) are wrapped so their
//! status mapping survives.

use axum::response::{IntoResponse, Response};
use catalog::CatalogError;
use identity::IdentityError;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use ledger::{LedgerError, TransactionReceipt};
use thiserror::Error;

pub type PurchaseResult<T> = Result<T, PurchaseError>;

#[derive(Debug, Error)]
pub enum PurchaseError {
    #[error("Order not found")]
    OrderNotFound,

    #[error("Buyer not found")]
    BuyerNotFound,

    #[error("Listing not found")]
    ListingNotFound,

    #[error("Verifier not found")]
    VerifierNotFound,

    /// Verify on an order that was created without a verifier or is
    /// already verified
    #[error("Verification not required")]
    VerificationNotRequired,

    #[error("Order is already closed")]
    AlreadyClosed,

    #[error("Order needs verification before it can be closed")]
    NeedsVerification,

    #[error("{0} authorization is required")]
    MissingAuthorization(&'static str),

    #[error("Rewards ({rewards}) exceed the listing price ({price})")]
    RewardExceedsPrice { rewards: u64, price: u64 },

    #[error("Invalid rewards: {0}")]
    InvalidRewards(String),

    #[error("Invalid account: {0}")]
    InvalidAccount(String),

    #[error("Create block {0} is out of range")]
    CreateBlockOutOfRange(u64),

    #[error("Invalid settlement transaction: {0}")]
    InvalidTransaction(String),

    #[error("One of buyer, seller or verifier is required")]
    MissingHistoryFilter,

    /// Mined but reverted; the order stays closeable
    #[error("Close Transaction Failed.")]
    SettlementReverted(TransactionReceipt),

    #[error("Settlement failed: {0}")]
    SettlementFailed(LedgerError),

    #[error("Timed out waiting for the settlement receipt")]
    SettlementTimeout,

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PurchaseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PurchaseError::OrderNotFound
            | PurchaseError::BuyerNotFound
            | PurchaseError::ListingNotFound
            | PurchaseError::VerifierNotFound
            | PurchaseError::VerificationNotRequired => ErrorKind::NotFound,
            PurchaseError::AlreadyClosed
            | PurchaseError::NeedsVerification
            | PurchaseError::MissingAuthorization(_)
            | PurchaseError::RewardExceedsPrice { .. }
            | PurchaseError::InvalidRewards(_)
            | PurchaseError::InvalidAccount(_)
            | PurchaseError::CreateBlockOutOfRange(_)
            | PurchaseError::InvalidTransaction(_)
            | PurchaseError::MissingHistoryFilter
            | PurchaseError::SettlementReverted(_) => ErrorKind::BadRequest,
            PurchaseError::SettlementFailed(e) => e.kind(),
            PurchaseError::SettlementTimeout => ErrorKind::GatewayTimeout,
            PurchaseError::Identity(e) => e.kind(),
            PurchaseError::Catalog(e) => e.kind(),
            PurchaseError::Database(_) | PurchaseError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            PurchaseError::Database(_) | PurchaseError::Internal(_) => {
                AppError::new(self.kind(), "Internal server error")
            }
            PurchaseError::Identity(e) => e.to_app_error(),
            PurchaseError::Catalog(e) => e.to_app_error(),
            PurchaseError::SettlementReverted(receipt) => {
                AppError::new(self.kind(), self.to_string())
                    .with_action("The order is still open; submit a corrected transaction")
                    .with_details(receipt.to_json())
            }
            PurchaseError::SettlementFailed(_) => {
                AppError::new(self.kind(), self.to_string()).with_action("The order is still open")
            }
            PurchaseError::SettlementTimeout => AppError::new(self.kind(), self.to_string())
                .with_action("Check the transaction on-chain, then retry the close"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            PurchaseError::Database(e) => {
                tracing::error!(error = %e, "Purchase database error");
            }
            PurchaseError::Internal(msg) => {
                tracing::error!(message = %msg, "Purchase internal error");
            }
            PurchaseError::SettlementReverted(receipt) => {
                tracing::warn!(
                    tx_hash = %receipt.transaction_hash,
                    block_number = receipt.block_number,
                    "Settlement transaction reverted"
                );
            }
            PurchaseError::SettlementFailed(e) if self.kind().is_server_error() => {
                tracing::error!(error = %e, "Settlement could not reach the ledger");
            }
            PurchaseError::SettlementTimeout => tracing::warn!("Settlement timed out"),
            _ => tracing::debug!(error = %self, "Purchase error"),
        }
    }
}

impl IntoResponse for PurchaseError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<kernel::AccountAddressError> for PurchaseError {
    fn from(err: kernel::AccountAddressError) -> Self {
        PurchaseError::InvalidAccount(err.to_string())
    }
}

impl From<kernel::AmountError> for PurchaseError {
    fn from(err: kernel::AmountError) -> Self {
        PurchaseError::InvalidRewards(err.to_string())
    }
}

impl From<LedgerError> for PurchaseError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Timeout => PurchaseError::SettlementTimeout,
            LedgerError::Reverted(receipt) => PurchaseError::SettlementReverted(receipt),
            LedgerError::InvalidTransaction(msg) => PurchaseError::InvalidTransaction(msg),
            other => PurchaseError::SettlementFailed(other),
        }
    }
}
