//! Check Token Use Case
//!
//! Resolves a bearer token to the trader it was issued for.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::TraderId;

use crate::application::config::IdentityConfig;
use crate::domain::entity::trader::Trader;
use crate::domain::repository::TraderRepository;
use crate::error::{IdentityError, IdentityResult};

pub struct CheckTokenUseCase<R>
where
    R: TraderRepository,
{
    repo: Arc<R>,
    config: Arc<IdentityConfig>,
}

impl<R> CheckTokenUseCase<R>
where
    R: TraderRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<IdentityConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, token: &str) -> IdentityResult<Trader> {
        let claims = self
            .config
            .token_signer()
            .verify(token, Utc::now())
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                IdentityError::TokenInvalid
            })?;

        // Token for a trader that no longer exists
        self.repo
            .find_by_id(TraderId::from_uuid(claims.subject))
            .await?
            .ok_or(IdentityError::TokenInvalid)
    }
}
