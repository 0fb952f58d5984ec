//! Order History (read-only projection)

use std::sync::Arc;

use kernel::id::PurchaseOrderId;

use crate::domain::repository::PurchaseOrderRepository;
use crate::domain::view::{HistoryFilter, PurchaseOrderView};
use crate::error::{PurchaseError, PurchaseResult};

pub struct OrderHistoryUseCase<P>
where
    P: PurchaseOrderRepository,
{
    orders: Arc<P>,
}

impl<P> OrderHistoryUseCase<P>
where
    P: PurchaseOrderRepository + Sync,
{
    pub fn new(orders: Arc<P>) -> Self {
        Self { orders }
    }

    pub async fn list(&self, filter: Option<HistoryFilter>) -> PurchaseResult<Vec<PurchaseOrderView>> {
        let filter = filter.ok_or(PurchaseError::MissingHistoryFilter)?;
        self.orders.find_views(&filter).await
    }

    pub async fn get(&self, order_id: PurchaseOrderId) -> PurchaseResult<PurchaseOrderView> {
        self.orders
            .find_view(order_id)
            .await?
            .ok_or(PurchaseError::OrderNotFound)
    }
}
