//! Domain Layer

pub mod entity;
pub mod repository;
pub mod value_object;
pub mod view;

pub use entity::purchase_order::PurchaseOrder;
pub use repository::PurchaseOrderRepository;
pub use view::{HistoryFilter, Party, PurchaseOrderView};
