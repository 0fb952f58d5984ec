//! Chain information

use std::sync::Arc;

use kernel::AccountAddress;

use crate::application::config::LedgerConfig;
use crate::domain::gateway::LedgerGateway;
use crate::error::LedgerResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainInfo {
    pub gas_price: u128,
    pub chain_id: u64,
    pub token_contract: Option<AccountAddress>,
}

pub struct ChainInfoUseCase<G>
where
    G: LedgerGateway,
{
    gateway: Arc<G>,
    config: Arc<LedgerConfig>,
}

impl<G> ChainInfoUseCase<G>
where
    G: LedgerGateway + Sync,
{
    pub fn new(gateway: Arc<G>, config: Arc<LedgerConfig>) -> Self {
        Self { gateway, config }
    }

    pub async fn execute(&self) -> LedgerResult<ChainInfo> {
        let (gas_price, chain_id) =
            tokio::try_join!(self.gateway.gas_price(), self.gateway.chain_id())?;

        Ok(ChainInfo {
            gas_price,
            chain_id,
            token_contract: self.config.token_contract.clone(),
        })
    }
}
