//! Ledger Router

use axum::{
    Router,
    routing::{get, post},
};

use crate::domain::gateway::LedgerGateway;
use crate::presentation::handlers::{self, LedgerAppState};

/// Create the Ledger router
///
/// Every route expects a [`identity::CurrentTrader`]; the caller layers
/// `identity::require_trader` on top.
pub fn ledger_router<G>(state: LedgerAppState<G>) -> Router
where
    G: LedgerGateway + Sync + 'static,
{
    Router::new()
        .route("/chainInfo", get(handlers::chain_info::<G>))
        .route("/balance", get(handlers::balance::<G>))
        .route("/nonce/{account}", get(handlers::nonce::<G>))
        .route("/rawTx", post(handlers::raw_tx::<G>))
        .with_state(state)
}
