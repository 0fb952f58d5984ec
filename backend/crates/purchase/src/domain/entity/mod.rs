pub mod purchase_order;
