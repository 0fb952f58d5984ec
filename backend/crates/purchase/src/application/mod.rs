//! Application Layer

pub mod close_order;
pub mod config;
pub mod create_order;
pub mod history;
pub mod locks;
pub mod verify_order;

pub use close_order::{CloseOrderOutput, CloseOrderUseCase};
pub use config::PurchaseConfig;
pub use create_order::{CreateOrderInput, CreateOrderUseCase};
pub use history::OrderHistoryUseCase;
pub use locks::OrderLocks;
pub use verify_order::VerifyOrderUseCase;
