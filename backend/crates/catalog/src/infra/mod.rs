//! Infrastructure Layer

pub mod ipfs;
pub mod postgres;
