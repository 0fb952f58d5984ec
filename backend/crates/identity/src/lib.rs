//! Identity Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Trader entity, value objects, repository trait
//! - `application/` - Sign-up, login, token check and directory use cases
//! - `infra/` - PostgreSQL implementation
//! - `presentation/` - HTTP handlers, DTOs, router, authentication middleware
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (optional server pepper)
//! - Stateless HMAC-signed bearer tokens with a fixed TTL
//! - Credential hashes never leave the domain layer

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::IdentityConfig;
pub use domain::entity::trader::Trader;
pub use domain::repository::{LocalTraderRepository, TraderRepository};
pub use domain::value_object::trader_name::TraderName;
pub use error::{IdentityError, IdentityResult};
pub use infra::postgres::PgTraderRepository;
pub use presentation::handlers::IdentityAppState;
pub use presentation::middleware::{CurrentTrader, require_trader};
pub use presentation::router::identity_router;
