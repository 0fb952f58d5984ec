//! Authorization Value Object
//!
//! 買い手・検証者がオフチェーンで署名したメッセージ。**不透明な文字列**として
//! 扱い、ここでは署名の検証を行わない (決済コントラクトが検証する)。
//!
//! ## 不変条件
//! - 前後の空白を除いて空でないこと
//! - 4096 バイト以下

use std::fmt;

use serde::Serialize;

use crate::error::PurchaseError;

const AUTHORIZATION_MAX_BYTES: usize = 4096;

#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Authorization(String);

impl Authorization {
    /// `role` names the signer in error messages ("Buyer", "Verifier")
    pub fn parse(raw: &str, role: &'static str) -> Result<Self, PurchaseError> {
        let value = raw.trim();
        if value.is_empty() || value.len() > AUTHORIZATION_MAX_BYTES {
            return Err(PurchaseError::MissingAuthorization(role));
        }
        Ok(Self(value.to_string()))
    }

    /// Restore from a database column; stored values were validated on write
    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head: String = self.0.chars().take(10).collect();
        write!(f, "Authorization({head}..)")
    }
}
