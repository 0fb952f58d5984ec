//! Close Purchase Order Use Case
//!
//! The seller hands over a pre-signed settlement transaction; it is relayed
//! verbatim and the order is closed once the receipt reports success.
//!
//! Concurrency: the per-order lock keeps two closes in this process from
//! both broadcasting, and the conditional write keeps two processes from
//! both committing.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::PurchaseOrderId;
use ledger::{LedgerError, LedgerGateway, RawTransaction};

use crate::application::config::PurchaseConfig;
use crate::application::locks::OrderLocks;
use crate::domain::entity::purchase_order::PurchaseOrder;
use crate::domain::repository::PurchaseOrderRepository;
use crate::error::{PurchaseError, PurchaseResult};

#[derive(Debug, Clone)]
pub struct CloseOrderOutput {
    /// Block of the settlement receipt
    pub create_block: u64,
    pub order: PurchaseOrder,
}

pub struct CloseOrderUseCase<P, G>
where
    P: PurchaseOrderRepository,
    G: LedgerGateway,
{
    orders: Arc<P>,
    gateway: Arc<G>,
    locks: Arc<OrderLocks>,
    config: Arc<PurchaseConfig>,
}

impl<P, G> CloseOrderUseCase<P, G>
where
    P: PurchaseOrderRepository + Sync,
    G: LedgerGateway + Sync,
{
    pub fn new(
        orders: Arc<P>,
        gateway: Arc<G>,
        locks: Arc<OrderLocks>,
        config: Arc<PurchaseConfig>,
    ) -> Self {
        Self {
            orders,
            gateway,
            locks,
            config,
        }
    }

    pub async fn execute(
        &self,
        order_id: PurchaseOrderId,
        raw_transaction: &str,
    ) -> PurchaseResult<CloseOrderOutput> {
        // Checked before any state is read
        let tx = RawTransaction::parse(raw_transaction)?;

        let _guard = self.locks.acquire(order_id).await;

        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(PurchaseError::OrderNotFound)?;
        order.ensure_closeable()?;

        tracing::info!(order_id = %order_id, tx = ?tx, "Submitting settlement transaction");

        let receipt = tokio::time::timeout(
            self.config.settlement_timeout,
            self.gateway.submit_raw_transaction(&tx),
        )
        .await
        .map_err(|_| PurchaseError::SettlementTimeout)?
        .map_err(|e| match e {
            LedgerError::Timeout => PurchaseError::SettlementTimeout,
            // The node refused the blob itself
            other => PurchaseError::SettlementFailed(other),
        })?;

        if !receipt.is_success() {
            return Err(PurchaseError::SettlementReverted(receipt));
        }

        let closed = match self
            .orders
            .mark_settled(order_id, receipt.block_number, Utc::now())
            .await
        {
            Ok(Some(order)) => order,
            Ok(None) => {
                // Only another process can get here first
                tracing::error!(
                    order_id = %order_id,
                    tx_hash = %receipt.transaction_hash,
                    "Settlement mined but the order was closed elsewhere"
                );
                return Err(PurchaseError::AlreadyClosed);
            }
            Err(e) => {
                tracing::error!(
                    order_id = %order_id,
                    tx_hash = %receipt.transaction_hash,
                    block_number = receipt.block_number,
                    error = %e,
                    "Settlement mined but could not be recorded"
                );
                return Err(e);
            }
        };

        tracing::info!(
            order_id = %order_id,
            tx_hash = %receipt.transaction_hash,
            block_number = receipt.block_number,
            "Purchase order closed"
        );

        Ok(CloseOrderOutput {
            create_block: receipt.block_number,
            order: closed,
        })
    }
}
