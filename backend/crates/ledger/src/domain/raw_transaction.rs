//! Pre-signed transaction blobs

use std::fmt;

use crate::error::LedgerError;

/// A signed, RLP-encoded transaction as `0x`-prefixed hex
///
/// Only the encoding is checked; the contents are relayed verbatim.
#[derive(Clone, PartialEq, Eq)]
pub struct RawTransaction(String);

impl RawTransaction {
    pub fn parse(raw: &str) -> Result<Self, LedgerError> {
        let raw = raw.trim();
        let digits = raw
            .strip_prefix("0x")
            .ok_or_else(|| LedgerError::InvalidTransaction("missing 0x prefix".to_string()))?;

        if digits.is_empty() {
            return Err(LedgerError::InvalidTransaction("empty transaction".to_string()));
        }
        hex::decode(digits).map_err(|e| LedgerError::InvalidTransaction(e.to_string()))?;

        Ok(Self(raw.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RawTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Blobs can be large; show the head only
        let head: String = self.0.chars().take(18).collect();
        write!(f, "RawTransaction({head}.., {} bytes)", (self.0.len() - 2) / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_even_hex() {
        let tx = RawTransaction::parse(" 0xF86B8085 ").unwrap();
        assert_eq!(tx.as_str(), "0xf86b8085");
        assert!(format!("{tx:?}").contains("4 bytes"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "0x", "f86b", "0xf86", "0xzz"] {
            assert!(
                matches!(RawTransaction::parse(bad), Err(LedgerError::InvalidTransaction(_))),
                "{bad:?}"
            );
        }
    }
}
