//! Purchase-Order Lifecycle
//!
//! The core of the marketplace. A purchase order records a buyer's
//! off-chain payment-channel authorization for a listing and moves through
//! three states:
//!
//! ```text
//!            create(verifier)              verify
//!   ──────────────────────────▶ PENDING_VERIFICATION ──────┐
//!                                                           ▼
//!   ──────────────────────────────────────────────▶ READY_TO_CLOSE ──close──▶ CLOSED
//!            create(no verifier)
//! ```
//!
//! Closing relays a seller-signed settlement transaction through the
//! [`ledger`] gateway. The history projection serves read-only joined
//! views of orders.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

pub use application::config::PurchaseConfig;
pub use application::locks::OrderLocks;
pub use domain::entity::purchase_order::PurchaseOrder;
pub use domain::repository::{LocalPurchaseOrderRepository, PurchaseOrderRepository};
pub use domain::value_object::order_state::OrderState;
pub use domain::value_object::reward_policy::RewardPolicy;
pub use domain::view::{HistoryFilter, Party, PurchaseOrderView};
pub use error::{PurchaseError, PurchaseResult};
pub use infra::postgres::PgPurchaseOrderRepository;
pub use presentation::handlers::PurchaseAppState;
pub use presentation::router::purchase_router;
