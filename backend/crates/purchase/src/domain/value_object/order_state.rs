//! Order State
//!
//! 状態はフラグ `needs_verification` / `needs_closure` から**導出**する。
//! 永続化はせず、レスポンスにのみ現れる。

use derive_more::Display;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    #[display("PENDING_VERIFICATION")]
    PendingVerification,
    #[display("READY_TO_CLOSE")]
    ReadyToClose,
    /// Terminal
    #[display("CLOSED")]
    Closed,
}

impl OrderState {
    pub const fn from_flags(needs_verification: bool, needs_closure: bool) -> Self {
        match (needs_verification, needs_closure) {
            (_, false) => Self::Closed,
            (true, true) => Self::PendingVerification,
            (false, true) => Self::ReadyToClose,
        }
    }

    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }
}
