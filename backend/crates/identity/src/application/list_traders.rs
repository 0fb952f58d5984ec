//! Trader directory

use std::sync::Arc;

use kernel::id::TraderId;

use crate::domain::entity::trader::Trader;
use crate::domain::repository::TraderRepository;
use crate::error::{IdentityError, IdentityResult};

pub struct ListTradersUseCase<R>
where
    R: TraderRepository,
{
    repo: Arc<R>,
}

impl<R> ListTradersUseCase<R>
where
    R: TraderRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn all(&self) -> IdentityResult<Vec<Trader>> {
        self.repo.list().await
    }

    pub async fn get(&self, trader_id: TraderId) -> IdentityResult<Trader> {
        self.repo
            .find_by_id(trader_id)
            .await?
            .ok_or(IdentityError::TraderNotFound)
    }
}
