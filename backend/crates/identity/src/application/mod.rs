//! Application Layer
//!
//! Use cases and application services.

pub mod check_token;
pub mod config;
pub mod list_traders;
pub mod sign_in;
pub mod sign_up;

pub use check_token::CheckTokenUseCase;
pub use config::IdentityConfig;
pub use list_traders::ListTradersUseCase;
pub use sign_in::{SignInInput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpUseCase};

use chrono::{DateTime, Utc};

use crate::domain::entity::trader::Trader;

/// Output of a successful sign-up or login
#[derive(Debug)]
pub struct AuthenticatedOutput {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub trader: Trader,
}
