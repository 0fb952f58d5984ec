//! Sign In Use Case
//!
//! Verifies a name/password pair and issues a token.

use std::sync::Arc;

use chrono::Utc;
use platform::password::ClearTextPassword;

use crate::application::AuthenticatedOutput;
use crate::application::config::IdentityConfig;
use crate::domain::repository::TraderRepository;
use crate::domain::value_object::trader_name::TraderName;
use crate::error::{IdentityError, IdentityResult};

pub struct SignInInput {
    pub name: String,
    pub password: String,
}

pub struct SignInUseCase<R>
where
    R: TraderRepository,
{
    repo: Arc<R>,
    config: Arc<IdentityConfig>,
}

impl<R> SignInUseCase<R>
where
    R: TraderRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<IdentityConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: SignInInput) -> IdentityResult<AuthenticatedOutput> {
        // A name that cannot exist is reported like a wrong password
        let name = TraderName::new(&input.name).map_err(|_| IdentityError::InvalidCredentials)?;

        let trader = self
            .repo
            .find_by_name(&name)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        let password = ClearTextPassword::unchecked(input.password);
        if !trader.password_hash.verify(&password, self.config.pepper()) {
            return Err(IdentityError::InvalidCredentials);
        }

        let (token, expires_at) = self
            .config
            .token_signer()
            .issue(trader.trader_id.into_uuid(), Utc::now());

        tracing::info!(trader_id = %trader.trader_id, "Trader logged in");

        Ok(AuthenticatedOutput {
            token,
            expires_at,
            trader,
        })
    }
}
