//! Infrastructure Layer

pub mod json_rpc;
