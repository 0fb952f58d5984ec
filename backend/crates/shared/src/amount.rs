//! Token amounts
//!
//! Prices and rewards are integral token units. They are stored in
//! PostgreSQL `BIGINT` columns, so the representable range is capped at
//! `i64::MAX`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("Amount {0} exceeds the storable maximum")]
    TooLarge(u64),

    #[error("Amount cannot be negative (got {0})")]
    Negative(i64),
}

/// Non-negative integer token amount
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct TokenAmount(u64);

impl TokenAmount {
    pub const ZERO: TokenAmount = TokenAmount(0);

    pub fn new(value: u64) -> Result<Self, AmountError> {
        if value > i64::MAX as u64 {
            return Err(AmountError::TooLarge(value));
        }
        Ok(Self(value))
    }

    /// Restore from a `BIGINT` column
    pub fn from_db(value: i64) -> Result<Self, AmountError> {
        u64::try_from(value)
            .map(Self)
            .map_err(|_| AmountError::Negative(value))
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Value for a `BIGINT` column (always in range by construction)
    pub fn as_i64(&self) -> i64 {
        self.0 as i64
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<u64> for TokenAmount {
    type Error = AmountError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TokenAmount> for u64 {
    fn from(amount: TokenAmount) -> Self {
        amount.0
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range() {
        assert!(TokenAmount::new(0).unwrap().is_zero());
        assert_eq!(TokenAmount::new(100).unwrap().value(), 100);
        assert_eq!(
            TokenAmount::new(u64::MAX),
            Err(AmountError::TooLarge(u64::MAX))
        );
    }

    #[test]
    fn test_db_roundtrip_bounds() {
        let amount = TokenAmount::new(i64::MAX as u64).unwrap();
        assert_eq!(TokenAmount::from_db(amount.as_i64()).unwrap(), amount);
        assert_eq!(TokenAmount::from_db(-1), Err(AmountError::Negative(-1)));
    }

    #[test]
    fn test_serde_as_number() {
        let amount = TokenAmount::new(42).unwrap();
        assert_eq!(serde_json::to_string(&amount).unwrap(), "42");
        assert!(serde_json::from_str::<TokenAmount>("18446744073709551615").is_err());
    }
}
