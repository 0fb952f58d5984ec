//! Ledger configuration

use std::time::Duration;

use kernel::AccountAddress;

#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// JSON-RPC endpoint of the node
    pub rpc_url: String,
    /// ERC-20 style token used for prices and balances
    pub token_contract: Option<AccountAddress>,
    /// Delay between `eth_getTransactionReceipt` polls
    pub receipt_poll_interval: Duration,
    /// Upper bound on waiting for a receipt after broadcast
    pub receipt_timeout: Duration,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            token_contract: None,
            receipt_poll_interval: Duration::from_secs(1),
            receipt_timeout: Duration::from_secs(120),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl LedgerConfig {
    /// Local dev node with a fast poll loop
    pub fn development() -> Self {
        Self {
            receipt_poll_interval: Duration::from_millis(250),
            ..Default::default()
        }
    }
}
