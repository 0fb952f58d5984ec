//! Sign Up Use Case
//!
//! Registers a new trader and issues a token.

use std::sync::Arc;

use chrono::Utc;
use kernel::AccountAddress;
use platform::password::ClearTextPassword;

use crate::application::AuthenticatedOutput;
use crate::application::config::IdentityConfig;
use crate::domain::entity::trader::Trader;
use crate::domain::repository::TraderRepository;
use crate::domain::value_object::trader_name::TraderName;
use crate::error::{IdentityError, IdentityResult};

pub struct SignUpInput {
    pub name: String,
    pub password: String,
    pub account: String,
}

pub struct SignUpUseCase<R>
where
    R: TraderRepository,
{
    repo: Arc<R>,
    config: Arc<IdentityConfig>,
}

impl<R> SignUpUseCase<R>
where
    R: TraderRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<IdentityConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: SignUpInput) -> IdentityResult<AuthenticatedOutput> {
        let name =
            TraderName::new(&input.name).map_err(|e| IdentityError::InvalidName(e.to_string()))?;
        let account = AccountAddress::parse(&input.account)?;

        if self.repo.exists_by_name(&name).await? {
            return Err(IdentityError::NameTaken);
        }
        if self.repo.exists_by_account(&account).await? {
            return Err(IdentityError::AccountTaken);
        }

        let password = ClearTextPassword::new(input.password)?;
        let password_hash = password.hash(self.config.pepper())?;

        let trader = Trader::new(name, account, password_hash);
        self.repo.create(&trader).await?;

        tracing::info!(
            trader_id = %trader.trader_id,
            name = %trader.name,
            account = %trader.account,
            "Trader signed up"
        );

        let (token, expires_at) = self
            .config
            .token_signer()
            .issue(trader.trader_id.into_uuid(), Utc::now());

        Ok(AuthenticatedOutput {
            token,
            expires_at,
            trader,
        })
    }
}
