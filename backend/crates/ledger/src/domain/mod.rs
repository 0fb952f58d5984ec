//! Domain Layer

pub mod gateway;
pub mod raw_transaction;
pub mod receipt;
