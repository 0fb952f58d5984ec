//! Trader Entity

use chrono::{DateTime, Utc};
use kernel::AccountAddress;
use kernel::id::TraderId;
use platform::password::HashedPassword;

use crate::domain::value_object::trader_name::TraderName;

/// A registered marketplace participant
#[derive(Debug, Clone)]
pub struct Trader {
    pub trader_id: TraderId,
    /// Unique login/display handle
    pub name: TraderName,
    /// Unique on-chain account
    pub account: AccountAddress,
    pub password_hash: HashedPassword,
    pub created_at: DateTime<Utc>,
}

/// Public view of a trader (no credentials)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraderProfile {
    pub trader_id: TraderId,
    pub name: String,
    pub account: AccountAddress,
    pub created_at: DateTime<Utc>,
}

impl Trader {
    pub fn new(name: TraderName, account: AccountAddress, password_hash: HashedPassword) -> Self {
        Self {
            trader_id: TraderId::new(),
            name,
            account,
            password_hash,
            created_at: Utc::now(),
        }
    }

    pub fn profile(&self) -> TraderProfile {
        TraderProfile {
            trader_id: self.trader_id,
            name: self.name.original().to_string(),
            account: self.account.clone(),
            created_at: self.created_at,
        }
    }
}
