//! Application Layer

pub mod account_state;
pub mod chain_info;
pub mod config;
pub mod relay;

pub use account_state::{AccountBalance, AccountStateUseCase};
pub use chain_info::{ChainInfo, ChainInfoUseCase};
pub use config::LedgerConfig;
pub use relay::RelayTransactionUseCase;
