//! Reward Policy
//!
//! How the `rewards` input of a purchase request turns into the amount
//! owed to the verifier.

use std::str::FromStr;

use derive_more::Display;
use kernel::TokenAmount;

use crate::error::PurchaseError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
pub enum RewardPolicy {
    /// The request carries the final amount
    #[default]
    #[display("absolute")]
    Absolute,
    /// The request carries a percentage (0..=100) of the listing price,
    /// rounded down
    #[display("percent")]
    PercentOfPrice,
}

impl RewardPolicy {
    pub fn compute(&self, requested: u64, price: TokenAmount) -> Result<TokenAmount, PurchaseError> {
        let rewards = match self {
            RewardPolicy::Absolute => requested,
            RewardPolicy::PercentOfPrice => {
                if requested > 100 {
                    return Err(PurchaseError::InvalidRewards(format!(
                        "percentage {requested} is above 100"
                    )));
                }
                // price <= i64::MAX, so the product fits in u128
                (u128::from(price.value()) * u128::from(requested) / 100) as u64
            }
        };

        if rewards > price.value() {
            return Err(PurchaseError::RewardExceedsPrice {
                rewards,
                price: price.value(),
            });
        }
        Ok(TokenAmount::new(rewards)?)
    }
}

impl FromStr for RewardPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "absolute" => Ok(Self::Absolute),
            "percent" | "percent_of_price" => Ok(Self::PercentOfPrice),
            other => Err(format!("unknown reward policy '{other}'")),
        }
    }
}
