//! Presentation Layer

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::PurchaseAppState;
pub use router::purchase_router;
