//! Raw transaction relay
//!
//! Clients sign transactions themselves (e.g. opening a payment channel)
//! and hand the blob to the backend, which broadcasts it and reports the
//! receipt.

use std::sync::Arc;

use crate::domain::gateway::LedgerGateway;
use crate::domain::raw_transaction::RawTransaction;
use crate::domain::receipt::TransactionReceipt;
use crate::error::{LedgerError, LedgerResult};

pub struct RelayTransactionUseCase<G>
where
    G: LedgerGateway,
{
    gateway: Arc<G>,
}

impl<G> RelayTransactionUseCase<G>
where
    G: LedgerGateway + Sync,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Broadcast and wait; a reverted receipt is an error carrying the receipt
    pub async fn execute(&self, raw: &str) -> LedgerResult<TransactionReceipt> {
        let tx = RawTransaction::parse(raw)?;
        let receipt = self.gateway.submit_raw_transaction(&tx).await?;

        if !receipt.is_success() {
            return Err(LedgerError::Reverted(receipt));
        }

        tracing::info!(
            tx_hash = %receipt.transaction_hash,
            block_number = receipt.block_number,
            "Relayed transaction mined"
        );
        Ok(receipt)
    }
}
