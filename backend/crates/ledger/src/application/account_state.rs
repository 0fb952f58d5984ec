//! Per-account ledger state (balances, nonce)

use std::sync::Arc;

use kernel::AccountAddress;

use crate::domain::gateway::LedgerGateway;
use crate::error::LedgerResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountBalance {
    pub token: u128,
    pub native: u128,
}

pub struct AccountStateUseCase<G>
where
    G: LedgerGateway,
{
    gateway: Arc<G>,
}

impl<G> AccountStateUseCase<G>
where
    G: LedgerGateway + Sync,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    pub async fn balance(&self, account: &AccountAddress) -> LedgerResult<AccountBalance> {
        let (token, native) = tokio::try_join!(
            self.gateway.token_balance(account),
            self.gateway.native_balance(account)
        )?;
        Ok(AccountBalance { token, native })
    }

    pub async fn nonce(&self, account: &AccountAddress) -> LedgerResult<u64> {
        self.gateway.nonce(account).await
    }
}
