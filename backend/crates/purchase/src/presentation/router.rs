//! Purchase Router

use axum::{
    Router,
    routing::{get, post},
};
use catalog::ListingRepository;
use identity::TraderRepository;
use ledger::LedgerGateway;

use crate::domain::repository::PurchaseOrderRepository;
use crate::presentation::handlers::{self, PurchaseAppState};

/// Create the Purchase router
///
/// Routes expect a [`identity::CurrentTrader`]; the caller layers
/// `identity::require_trader` on top.
pub fn purchase_router<P, T, L, G>(state: PurchaseAppState<P, T, L, G>) -> Router
where
    P: PurchaseOrderRepository + Sync + 'static,
    T: TraderRepository + Sync + 'static,
    L: ListingRepository + Sync + 'static,
    G: LedgerGateway + Sync + 'static,
{
    Router::new()
        .route("/buyer/purchase", post(handlers::purchase::<P, T, L, G>))
        .route("/verifier/sign", post(handlers::verify::<P, T, L, G>))
        .route("/seller/close", post(handlers::close::<P, T, L, G>))
        .route("/history", get(handlers::history::<P, T, L, G>))
        .route("/history/{id}", get(handlers::history_item::<P, T, L, G>))
        .with_state(state)
}
