//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of marketplace vocabulary:
//! - The unified wire error and its problem-details rendering
//! - Typed ID wrappers for traders, listings and purchase orders
//! - On-chain account addresses and token amounts
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod kind;
    pub mod problem;
}
pub mod account;
pub mod amount;
pub mod id;

pub use account::{AccountAddress, AccountAddressError};
pub use amount::{AmountError, TokenAmount};
