//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use identity::CurrentTrader;
use kernel::AccountAddress;

use crate::application::config::LedgerConfig;
use crate::application::{AccountStateUseCase, ChainInfoUseCase, RelayTransactionUseCase};
use crate::domain::gateway::LedgerGateway;
use crate::error::LedgerResult;
use crate::presentation::dto::{
    BalanceQuery, BalanceResponse, ChainInfoResponse, NonceResponse, RawTxRequest, RawTxResponse,
};

pub struct LedgerAppState<G>
where
    G: LedgerGateway + Sync + 'static,
{
    pub gateway: Arc<G>,
    pub config: Arc<LedgerConfig>,
}

impl<G> LedgerAppState<G>
where
    G: LedgerGateway + Sync + 'static,
{
    pub fn new(gateway: Arc<G>, config: Arc<LedgerConfig>) -> Self {
        Self { gateway, config }
    }
}

impl<G> Clone for LedgerAppState<G>
where
    G: LedgerGateway + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            config: self.config.clone(),
        }
    }
}

/// GET /chainInfo
pub async fn chain_info<G>(
    State(state): State<LedgerAppState<G>>,
) -> LedgerResult<Json<ChainInfoResponse>>
where
    G: LedgerGateway + Sync + 'static,
{
    let info = ChainInfoUseCase::new(state.gateway.clone(), state.config.clone())
        .execute()
        .await?;
    Ok(Json(info.into()))
}

/// GET /balance?account=
///
/// Without `account` the caller's own balance is returned.
pub async fn balance<G>(
    State(state): State<LedgerAppState<G>>,
    current: CurrentTrader,
    Query(query): Query<BalanceQuery>,
) -> LedgerResult<Json<BalanceResponse>>
where
    G: LedgerGateway + Sync + 'static,
{
    let account = match query.account.as_deref() {
        Some(raw) => AccountAddress::parse(raw)?,
        None => current.account,
    };

    let balance = AccountStateUseCase::new(state.gateway.clone())
        .balance(&account)
        .await?;
    Ok(Json(balance.into()))
}

/// GET /nonce/{account}
pub async fn nonce<G>(
    State(state): State<LedgerAppState<G>>,
    Path(account): Path<String>,
) -> LedgerResult<Json<NonceResponse>>
where
    G: LedgerGateway + Sync + 'static,
{
    let account = AccountAddress::parse(&account)?;
    let nonce = AccountStateUseCase::new(state.gateway.clone())
        .nonce(&account)
        .await?;
    Ok(Json(NonceResponse { nonce }))
}

/// POST /rawTx
pub async fn raw_tx<G>(
    State(state): State<LedgerAppState<G>>,
    current: CurrentTrader,
    Json(req): Json<RawTxRequest>,
) -> LedgerResult<Json<RawTxResponse>>
where
    G: LedgerGateway + Sync + 'static,
{
    tracing::debug!(trader_id = %current.trader_id, "Relaying raw transaction");

    let receipt = RelayTransactionUseCase::new(state.gateway.clone())
        .execute(&req.data)
        .await?;
    Ok(Json(receipt.into()))
}
