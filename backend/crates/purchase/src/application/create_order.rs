//! Create Purchase Order Use Case
//!
//! Records a buyer's intent to purchase a listing. No ledger interaction:
//! the payment channel was already opened by the buyer at `create_block`.

use std::sync::Arc;

use catalog::ListingRepository;
use identity::TraderRepository;
use kernel::AccountAddress;
use kernel::id::ListingId;
use uuid::Uuid;

use crate::application::config::PurchaseConfig;
use crate::domain::entity::purchase_order::{NewPurchaseOrder, PurchaseOrder};
use crate::domain::repository::PurchaseOrderRepository;
use crate::domain::value_object::authorization::Authorization;
use crate::error::{PurchaseError, PurchaseResult};

#[derive(Debug, Clone)]
pub struct CreateOrderInput {
    pub buyer: String,
    pub listing: String,
    pub verifier: Option<String>,
    pub rewards: u64,
    pub create_block: u64,
    pub buyer_auth: String,
}

pub struct CreateOrderUseCase<P, T, L>
where
    P: PurchaseOrderRepository,
    T: TraderRepository,
    L: ListingRepository,
{
    orders: Arc<P>,
    traders: Arc<T>,
    listings: Arc<L>,
    config: Arc<PurchaseConfig>,
}

impl<P, T, L> CreateOrderUseCase<P, T, L>
where
    P: PurchaseOrderRepository + Sync,
    T: TraderRepository + Sync,
    L: ListingRepository + Sync,
{
    pub fn new(
        orders: Arc<P>,
        traders: Arc<T>,
        listings: Arc<L>,
        config: Arc<PurchaseConfig>,
    ) -> Self {
        Self {
            orders,
            traders,
            listings,
            config,
        }
    }

    pub async fn execute(&self, input: CreateOrderInput) -> PurchaseResult<PurchaseOrder> {
        // Malformed input is rejected before any lookup
        let buyer_auth = Authorization::parse(&input.buyer_auth, "Buyer")?;
        // Block numbers are stored as BIGINT
        if i64::try_from(input.create_block).is_err() {
            return Err(PurchaseError::CreateBlockOutOfRange(input.create_block));
        }
        let buyer_account = AccountAddress::parse(&input.buyer)?;
        let verifier_account = input
            .verifier
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .map(AccountAddress::parse)
            .transpose()?;
        // An id that does not parse names no listing
        let listing_id = Uuid::parse_str(input.listing.trim())
            .map(ListingId::from_uuid)
            .map_err(|_| PurchaseError::ListingNotFound)?;

        let buyer = self
            .traders
            .find_by_account(&buyer_account)
            .await?
            .ok_or(PurchaseError::BuyerNotFound)?;

        let listing = self
            .listings
            .find_by_id(listing_id)
            .await?
            .ok_or(PurchaseError::ListingNotFound)?;

        let verifier = match &verifier_account {
            Some(account) => Some(
                self.traders
                    .find_by_account(account)
                    .await?
                    .ok_or(PurchaseError::VerifierNotFound)?,
            ),
            None => None,
        };

        let rewards = match verifier {
            Some(_) => self
                .config
                .reward_policy
                .compute(input.rewards, listing.price)?,
            None => kernel::TokenAmount::ZERO,
        };

        let order = PurchaseOrder::new(NewPurchaseOrder {
            buyer_id: buyer.trader_id,
            listing_id: listing.listing_id,
            verifier_id: verifier.map(|v| v.trader_id),
            create_block: input.create_block,
            rewards,
            buyer_auth,
        });
        self.orders.create(&order).await?;

        tracing::info!(
            order_id = %order.order_id,
            buyer_id = %order.buyer_id,
            listing_id = %order.listing_id,
            state = %order.state(),
            rewards = %order.rewards,
            "Purchase order created"
        );

        Ok(order)
    }
}
