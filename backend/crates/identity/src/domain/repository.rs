//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::AccountAddress;
use kernel::id::TraderId;

use crate::domain::entity::trader::Trader;
use crate::domain::value_object::trader_name::TraderName;
use crate::error::IdentityResult;

/// Trader repository trait
#[trait_variant::make(TraderRepository: Send)]
pub trait LocalTraderRepository {
    /// Persist a new trader; unique violations surface as
    /// `NameTaken` / `AccountTaken`
    async fn create(&self, trader: &Trader) -> IdentityResult<()>;

    async fn find_by_id(&self, trader_id: TraderId) -> IdentityResult<Option<Trader>>;

    /// Lookup by canonical name
    async fn find_by_name(&self, name: &TraderName) -> IdentityResult<Option<Trader>>;

    async fn find_by_account(&self, account: &AccountAddress) -> IdentityResult<Option<Trader>>;

    async fn exists_by_name(&self, name: &TraderName) -> IdentityResult<bool>;

    async fn exists_by_account(&self, account: &AccountAddress) -> IdentityResult<bool>;

    /// All traders, oldest first
    async fn list(&self) -> IdentityResult<Vec<Trader>>;
}
