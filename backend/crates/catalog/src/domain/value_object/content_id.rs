//! Content Id Value Object
//!
//! コンテンツストア (IPFS) が返す**内容アドレス**。購入後の受け渡しに使うため、
//! 公開されるリスティングのビューには含めない。
//!
//! ## 不変条件
//! - ASCII 英数字のみ (CIDv0 の base58 / CIDv1 の base32 をどちらも満たす)
//! - 長さ: 8〜128文字

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

const CONTENT_ID_MIN_LENGTH: usize = 8;
const CONTENT_ID_MAX_LENGTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentId(String);

impl ContentId {
    pub fn parse(raw: &str) -> Result<Self, CatalogError> {
        let raw = raw.trim();
        let length = raw.len();

        if !(CONTENT_ID_MIN_LENGTH..=CONTENT_ID_MAX_LENGTH).contains(&length) {
            return Err(CatalogError::InvalidContentId(format!(
                "length {length} outside {CONTENT_ID_MIN_LENGTH}..={CONTENT_ID_MAX_LENGTH}"
            )));
        }
        if let Some(c) = raw.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(CatalogError::InvalidContentId(format!(
                "unexpected character '{c}'"
            )));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ContentId {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ContentId> for String {
    fn from(cid: ContentId) -> Self {
        cid.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CID_V0: &str = "QmZ3gZXbckAxfJafysmmoNPwx67WiaLdqoYCxrnVWNeJ7R";

    #[test]
    fn test_parse_valid() {
        assert_eq!(ContentId::parse(CID_V0).unwrap().as_str(), CID_V0);
        assert!(
            ContentId::parse("bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi").is_ok()
        );
        assert_eq!(ContentId::parse(&format!(" {CID_V0} ")).unwrap().as_str(), CID_V0);
    }

    #[test]
    fn test_parse_invalid() {
        for bad in ["", "Qm", "../../etc/passwd", "QmZ3gZXbckAx fJafys", &"a".repeat(129)] {
            assert!(
                matches!(ContentId::parse(bad), Err(CatalogError::InvalidContentId(_))),
                "{bad:?}"
            );
        }
    }
}
