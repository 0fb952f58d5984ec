//! On-chain account address
//!
//! Traders are identified on the ledger by a 20-byte account address written
//! as `0x` followed by 40 hex digits. Addresses are kept in lowercase so that
//! checksummed and plain spellings of the same account compare equal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const ADDRESS_HEX_LEN: usize = 40;

/// Address parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountAddressError {
    #[error("Account address must start with 0x")]
    MissingPrefix,

    #[error("Account address must have 40 hex digits (got {0})")]
    WrongLength(usize),

    #[error("Account address contains a non-hex character")]
    InvalidCharacter,
}

/// Normalized (lowercase) account address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountAddress(String);

impl AccountAddress {
    /// Parse and normalize an address
    pub fn parse(raw: &str) -> Result<Self, AccountAddressError> {
        let raw = raw.trim();
        let hex = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .ok_or(AccountAddressError::MissingPrefix)?;

        if hex.len() != ADDRESS_HEX_LEN {
            return Err(AccountAddressError::WrongLength(hex.len()));
        }
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AccountAddressError::InvalidCharacter);
        }

        Ok(Self(format!("0x{}", hex.to_ascii_lowercase())))
    }

    /// `0x`-prefixed lowercase form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 40 hex digits without the prefix
    pub fn hex_digits(&self) -> &str {
        &self.0[2..]
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountAddress {
    type Err = AccountAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for AccountAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
