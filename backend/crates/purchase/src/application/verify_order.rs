//! Verify Purchase Order Use Case

use std::sync::Arc;

use chrono::Utc;
use kernel::id::PurchaseOrderId;

use crate::domain::entity::purchase_order::PurchaseOrder;
use crate::domain::repository::PurchaseOrderRepository;
use crate::domain::value_object::authorization::Authorization;
use crate::error::{PurchaseError, PurchaseResult};

pub struct VerifyOrderUseCase<P>
where
    P: PurchaseOrderRepository,
{
    orders: Arc<P>,
}

impl<P> VerifyOrderUseCase<P>
where
    P: PurchaseOrderRepository + Sync,
{
    pub fn new(orders: Arc<P>) -> Self {
        Self { orders }
    }

    /// Record the verifier's sign-off
    ///
    /// The authorization is stored as given; the settlement contract checks
    /// it when the seller closes the channel.
    pub async fn execute(
        &self,
        order_id: PurchaseOrderId,
        verifier_auth: &str,
    ) -> PurchaseResult<PurchaseOrder> {
        let verifier_auth = Authorization::parse(verifier_auth, "Verifier")?;

        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(PurchaseError::OrderNotFound)?;
        order.ensure_verifiable()?;

        // A concurrent Verify can win between the read and the write
        let verified = self
            .orders
            .mark_verified(order_id, &verifier_auth, Utc::now())
            .await?
            .ok_or(PurchaseError::VerificationNotRequired)?;

        tracing::info!(order_id = %order_id, "Purchase order verified");
        Ok(verified)
    }
}
