//! Ledger Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::receipt::TransactionReceipt;

pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// The node answered with a JSON-RPC error object (e.g. bad nonce,
    /// insufficient funds, malformed transaction)
    #[error("Node rejected request: {message} (code {code})")]
    Rpc { code: i64, message: String },

    /// The node could not be reached
    #[error("Ledger node unreachable: {0}")]
    Transport(String),

    #[error("Timed out waiting for the ledger node")]
    Timeout,

    /// The node answered with something that is not a valid JSON-RPC reply
    #[error("Unexpected response from ledger node: {0}")]
    InvalidResponse(String),

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Invalid account: {0}")]
    InvalidAccount(String),

    #[error("Token contract is not configured")]
    TokenContractNotConfigured,

    /// Mined, but reverted
    #[error("Transaction Failed")]
    Reverted(TransactionReceipt),
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::Rpc { .. }
            | LedgerError::InvalidTransaction(_)
            | LedgerError::InvalidAccount(_)
            | LedgerError::Reverted(_) => ErrorKind::BadRequest,
            LedgerError::Transport(_) | LedgerError::InvalidResponse(_) => ErrorKind::BadGateway,
            LedgerError::Timeout => ErrorKind::GatewayTimeout,
            LedgerError::TokenContractNotConfigured => ErrorKind::ServiceUnavailable,
        }
    }

    /// Node-side hiccups worth retrying on an idempotent read
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LedgerError::Transport(_) | LedgerError::InvalidResponse(_) | LedgerError::Timeout
        )
    }

    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            LedgerError::Reverted(receipt) => err.with_details(receipt.to_json()),
            LedgerError::Timeout => err.with_action("Retry once the node catches up"),
            _ => err,
        }
    }

    fn log(&self) {
        match self {
            LedgerError::Transport(msg) | LedgerError::InvalidResponse(msg) => {
                tracing::error!(error = %msg, "Ledger node failure");
            }
            LedgerError::Timeout => tracing::warn!("Ledger node timed out"),
            LedgerError::Reverted(receipt) => {
                tracing::warn!(tx_hash = %receipt.transaction_hash, "Transaction reverted");
            }
            _ => tracing::debug!(error = %self, "Ledger error"),
        }
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<reqwest::Error> for LedgerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LedgerError::Timeout
        } else if err.is_decode() {
            LedgerError::InvalidResponse(err.to_string())
        } else {
            LedgerError::Transport(err.to_string())
        }
    }
}

impl From<kernel::AccountAddressError> for LedgerError {
    fn from(err: kernel::AccountAddressError) -> Self {
        LedgerError::InvalidAccount(err.to_string())
    }
}
