//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC-SHA256, base64url, random bytes)
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Signed bearer tokens
//! - Request header helpers

pub mod crypto;
pub mod header;
pub mod password;
pub mod token;
