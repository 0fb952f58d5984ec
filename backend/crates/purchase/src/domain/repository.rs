//! Purchase Order Repository trait

use chrono::{DateTime, Utc};
use kernel::id::PurchaseOrderId;

use crate::domain::entity::purchase_order::PurchaseOrder;
use crate::domain::value_object::authorization::Authorization;
use crate::domain::view::{HistoryFilter, PurchaseOrderView};
use crate::error::PurchaseResult;

#[trait_variant::make(PurchaseOrderRepository: Send)]
pub trait LocalPurchaseOrderRepository {
    async fn create(&self, order: &PurchaseOrder) -> PurchaseResult<()>;

    async fn find_by_id(&self, order_id: PurchaseOrderId) -> PurchaseResult<Option<PurchaseOrder>>;

    /// Conditional PENDING_VERIFICATION → READY_TO_CLOSE
    ///
    /// `None` when the order was not in that state at write time.
    async fn mark_verified(
        &self,
        order_id: PurchaseOrderId,
        verifier_auth: &Authorization,
        now: DateTime<Utc>,
    ) -> PurchaseResult<Option<PurchaseOrder>>;

    /// Conditional READY_TO_CLOSE → CLOSED
    ///
    /// `None` when the order was not in that state at write time.
    async fn mark_settled(
        &self,
        order_id: PurchaseOrderId,
        settled_block: u64,
        now: DateTime<Utc>,
    ) -> PurchaseResult<Option<PurchaseOrder>>;

    async fn find_view(&self, order_id: PurchaseOrderId)
    -> PurchaseResult<Option<PurchaseOrderView>>;

    /// Newest first
    async fn find_views(&self, filter: &HistoryFilter) -> PurchaseResult<Vec<PurchaseOrderView>>;
}
