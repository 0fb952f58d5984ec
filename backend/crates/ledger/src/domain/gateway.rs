//! Ledger Gateway trait
//!
//! Implementation is in the infrastructure layer.

use kernel::AccountAddress;

use crate::domain::raw_transaction::RawTransaction;
use crate::domain::receipt::TransactionReceipt;
use crate::error::LedgerResult;

#[trait_variant::make(LedgerGateway: Send)]
pub trait LocalLedgerGateway {
    /// Broadcast a signed transaction and wait until it is mined
    ///
    /// A reverted transaction is still `Ok`; callers inspect the status.
    async fn submit_raw_transaction(&self, tx: &RawTransaction)
    -> LedgerResult<TransactionReceipt>;

    /// Balance of the configured token contract
    async fn token_balance(&self, account: &AccountAddress) -> LedgerResult<u128>;

    /// Native currency balance (wei)
    async fn native_balance(&self, account: &AccountAddress) -> LedgerResult<u128>;

    /// Transaction count including pending transactions
    async fn nonce(&self, account: &AccountAddress) -> LedgerResult<u64>;

    async fn gas_price(&self) -> LedgerResult<u128>;

    async fn chain_id(&self) -> LedgerResult<u64>;
}
