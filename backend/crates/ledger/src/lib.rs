//! Ledger Gateway
//!
//! Talks to an Ethereum-compatible JSON-RPC node on behalf of the
//! marketplace:
//! - relays pre-signed raw transactions and waits for their receipts
//! - reads token / native balances, nonces, gas price and chain id
//!
//! The settlement contract itself is opaque here; transactions are
//! forwarded verbatim and never re-validated.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


pub use application::config::LedgerConfig;
pub use domain::gateway::{LedgerGateway, LocalLedgerGateway};
pub use domain::receipt::{ReceiptStatus, TransactionReceipt};
pub use domain::raw_transaction::RawTransaction;
pub use error::{LedgerError, LedgerResult};
pub use infra::json_rpc::JsonRpcLedger;
pub use presentation::handlers::LedgerAppState;
pub use presentation::router::ledger_router;
