//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use catalog::ListingRepository;
use identity::{CurrentTrader, TraderRepository};
use kernel::id::PurchaseOrderId;
use ledger::LedgerGateway;
use uuid::Uuid;

use crate::application::config::PurchaseConfig;
use crate::application::locks::OrderLocks;
use crate::application::{
    CloseOrderUseCase, CreateOrderInput, CreateOrderUseCase, OrderHistoryUseCase,
    VerifyOrderUseCase,
};
use crate::domain::repository::PurchaseOrderRepository;
use crate::domain::view::HistoryFilter;
use crate::error::{PurchaseError, PurchaseResult};
use crate::presentation::dto::{
    CloseRequest, CloseResponse, HistoryQuery, OrderResponse, OrderViewResponse, PurchaseRequest,
    VerifyRequest,
};

/// Shared state of the purchase routes
///
/// `locks` must be shared by every clone so Close serializes per order.
pub struct PurchaseAppState<P, T, L, G>
where
    P: PurchaseOrderRepository + Sync + 'static,
    T: TraderRepository + Sync + 'static,
    L: ListingRepository + Sync + 'static,
    G: LedgerGateway + Sync + 'static,
{
    pub orders: Arc<P>,
    pub traders: Arc<T>,
    pub listings: Arc<L>,
    pub gateway: Arc<G>,
    pub locks: Arc<OrderLocks>,
    pub config: Arc<PurchaseConfig>,
}

impl<P, T, L, G> PurchaseAppState<P, T, L, G>
where
    P: PurchaseOrderRepository + Sync + 'static,
    T: TraderRepository + Sync + 'static,
    L: ListingRepository + Sync + 'static,
    G: LedgerGateway + Sync + 'static,
{
    pub fn new(
        orders: Arc<P>,
        traders: Arc<T>,
        listings: Arc<L>,
        gateway: Arc<G>,
        config: PurchaseConfig,
    ) -> Self {
        Self {
            orders,
            traders,
            listings,
            gateway,
            locks: Arc::new(OrderLocks::new()),
            config: Arc::new(config),
        }
    }
}

impl<P, T, L, G> Clone for PurchaseAppState<P, T, L, G>
where
    P: PurchaseOrderRepository + Sync + 'static,
    T: TraderRepository + Sync + 'static,
    L: ListingRepository + Sync + 'static,
    G: LedgerGateway + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            orders: self.orders.clone(),
            traders: self.traders.clone(),
            listings: self.listings.clone(),
            gateway: self.gateway.clone(),
            locks: self.locks.clone(),
            config: self.config.clone(),
        }
    }
}

/// Order ids that do not parse cannot name an order
fn parse_order_id(raw: &str) -> PurchaseResult<PurchaseOrderId> {
    Uuid::parse_str(raw.trim())
        .map(PurchaseOrderId::from_uuid)
        .map_err(|_| PurchaseError::OrderNotFound)
}

/// POST /buyer/purchase
pub async fn purchase<P, T, L, G>(
    State(state): State<PurchaseAppState<P, T, L, G>>,
    current: CurrentTrader,
    Json(req): Json<PurchaseRequest>,
) -> PurchaseResult<Json<OrderResponse>>
where
    P: PurchaseOrderRepository + Sync + 'static,
    T: TraderRepository + Sync + 'static,
    L: ListingRepository + Sync + 'static,
    G: LedgerGateway + Sync + 'static,
{
    tracing::debug!(trader_id = %current.trader_id, "Purchase requested");

    let use_case = CreateOrderUseCase::new(
        state.orders.clone(),
        state.traders.clone(),
        state.listings.clone(),
        state.config.clone(),
    );

    let order = use_case
        .execute(CreateOrderInput {
            buyer: req.buyer,
            listing: req.listing,
            verifier: req.verifier,
            rewards: req.rewards.value()?,
            create_block: req.create_block,
            buyer_auth: req.buyer_auth,
        })
        .await?;

    Ok(Json(OrderResponse::from(&order)))
}

/// POST /verifier/sign
pub async fn verify<P, T, L, G>(
    State(state): State<PurchaseAppState<P, T, L, G>>,
    current: CurrentTrader,
    Json(req): Json<VerifyRequest>,
) -> PurchaseResult<Json<OrderResponse>>
where
    P: PurchaseOrderRepository + Sync + 'static,
    T: TraderRepository + Sync + 'static,
    L: ListingRepository + Sync + 'static,
    G: LedgerGateway + Sync + 'static,
{
    let order_id = parse_order_id(&req.item)?;
    tracing::debug!(trader_id = %current.trader_id, order_id = %order_id, "Verification submitted");

    let order = VerifyOrderUseCase::new(state.orders.clone())
        .execute(order_id, &req.verifier_auth)
        .await?;

    Ok(Json(OrderResponse::from(&order)))
}

/// POST /seller/close
pub async fn close<P, T, L, G>(
    State(state): State<PurchaseAppState<P, T, L, G>>,
    current: CurrentTrader,
    Json(req): Json<CloseRequest>,
) -> PurchaseResult<Json<CloseResponse>>
where
    P: PurchaseOrderRepository + Sync + 'static,
    T: TraderRepository + Sync + 'static,
    L: ListingRepository + Sync + 'static,
    G: LedgerGateway + Sync + 'static,
{
    let order_id = parse_order_id(&req.id)?;
    tracing::debug!(trader_id = %current.trader_id, order_id = %order_id, "Close requested");

    let output = CloseOrderUseCase::new(
        state.orders.clone(),
        state.gateway.clone(),
        state.locks.clone(),
        state.config.clone(),
    )
    .execute(order_id, &req.data)
    .await?;

    Ok(Json(CloseResponse {
        create_block: output.create_block,
        purchase: OrderResponse::from(&output.order),
    }))
}

/// GET /history?buyer= | ?seller= | ?verifier=
pub async fn history<P, T, L, G>(
    State(state): State<PurchaseAppState<P, T, L, G>>,
    current: CurrentTrader,
    Query(query): Query<HistoryQuery>,
) -> PurchaseResult<Json<Vec<OrderViewResponse>>>
where
    P: PurchaseOrderRepository + Sync + 'static,
    T: TraderRepository + Sync + 'static,
    L: ListingRepository + Sync + 'static,
    G: LedgerGateway + Sync + 'static,
{
    let filter = HistoryFilter::from_query(
        query.buyer.as_deref(),
        query.seller.as_deref(),
        query.verifier.as_deref(),
    )?;

    let views = OrderHistoryUseCase::new(state.orders.clone())
        .list(filter)
        .await?;

    Ok(Json(
        views
            .iter()
            .map(|view| OrderViewResponse::for_viewer(view, current.trader_id))
            .collect(),
    ))
}

/// GET /history/{id}
pub async fn history_item<P, T, L, G>(
    State(state): State<PurchaseAppState<P, T, L, G>>,
    current: CurrentTrader,
    Path(id): Path<String>,
) -> PurchaseResult<Json<OrderViewResponse>>
where
    P: PurchaseOrderRepository + Sync + 'static,
    T: TraderRepository + Sync + 'static,
    L: ListingRepository + Sync + 'static,
    G: LedgerGateway + Sync + 'static,
{
    let order_id = parse_order_id(&id)?;
    let view = OrderHistoryUseCase::new(state.orders.clone())
        .get(order_id)
        .await?;

    Ok(Json(OrderViewResponse::for_viewer(&view, current.trader_id)))
}
