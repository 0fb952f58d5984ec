//! Trader Name Value Object
//!
//! トレーダー名はログインと画面表示に使う**公開ハンドル**。
//!
//! ## 設計方針
//! - ASCII 英数字と `_` `.` `-` のみ許可
//! - NFKC 正規化 → trim → 検証 の順で処理
//! - 表示用の original は大文字小文字を保持し、一意性判定は小文字の canonical で行う
//!
//! ## 不変条件
//! - 長さ: 2〜32文字（正規化後）

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

pub const TRADER_NAME_MIN_LENGTH: usize = 2;
pub const TRADER_NAME_MAX_LENGTH: usize = 32;

const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '-'];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraderNameError {
    #[error("Trader name is too short ({length} chars, minimum {min})")]
    TooShort { length: usize, min: usize },

    #[error("Trader name is too long ({length} chars, maximum {max})")]
    TooLong { length: usize, max: usize },

    #[error("Invalid character '{char}' at position {position}. Only A-Z, a-z, 0-9, _, ., - are allowed")]
    InvalidCharacter { char: char, position: usize },
}

/// Validated, normalized trader name
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TraderName {
    original: String,
    canonical: String,
}

impl TraderName {
    pub fn new(input: impl AsRef<str>) -> Result<Self, TraderNameError> {
        let original = input.as_ref().nfkc().collect::<String>().trim().to_string();

        let length = original.chars().count();
        if length < TRADER_NAME_MIN_LENGTH {
            return Err(TraderNameError::TooShort {
                length,
                min: TRADER_NAME_MIN_LENGTH,
            });
        }
        if length > TRADER_NAME_MAX_LENGTH {
            return Err(TraderNameError::TooLong {
                length,
                max: TRADER_NAME_MAX_LENGTH,
            });
        }

        if let Some((position, char)) = original
            .chars()
            .enumerate()
            .find(|(_, c)| !(c.is_ascii_alphanumeric() || ALLOWED_SPECIAL_CHARS.contains(c)))
        {
            return Err(TraderNameError::InvalidCharacter { char, position });
        }

        let canonical = original.to_ascii_lowercase();
        Ok(Self {
            original,
            canonical,
        })
    }

    /// Restore from a stored value (already validated on the way in)
    pub fn from_db(original: &str) -> Self {
        Self {
            original: original.to_string(),
            canonical: original.to_ascii_lowercase(),
        }
    }

    /// Name as entered (case preserved)
    #[inline]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Lowercase form used for uniqueness
    #[inline]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

impl fmt::Debug for TraderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TraderName").field(&self.original).finish()
    }
}

impl fmt::Display for TraderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl TryFrom<String> for TraderName {
    type Error = TraderNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TraderName> for String {
    fn from(name: TraderName) -> Self {
        name.original
    }
}
