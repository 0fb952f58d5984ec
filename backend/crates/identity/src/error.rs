//! Identity Error Types
//!
//! Identity-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Identity-specific result type alias
pub type IdentityResult<T> = Result<T, IdentityError>;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Trader not found")]
    TraderNotFound,

    #[error("Trader name already exists")]
    NameTaken,

    #[error("Account is already registered")]
    AccountTaken,

    /// Unknown name or wrong password; deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token is invalid or expired")]
    TokenInvalid,

    #[error("Authentication token is missing")]
    MissingToken,

    #[error("Invalid account: {0}")]
    InvalidAccount(String),

    #[error("Invalid trader name: {0}")]
    InvalidName(String),

    #[error("Password validation failed: {0}")]
    PasswordValidation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IdentityError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdentityError::TraderNotFound => ErrorKind::NotFound,
            IdentityError::NameTaken | IdentityError::AccountTaken => ErrorKind::Conflict,
            IdentityError::InvalidCredentials
            | IdentityError::TokenInvalid
            | IdentityError::MissingToken => ErrorKind::Unauthorized,
            IdentityError::InvalidAccount(_)
            | IdentityError::InvalidName(_)
            | IdentityError::PasswordValidation(_) => ErrorKind::BadRequest,
            IdentityError::Database(_) | IdentityError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError; server-side details are not leaked
    pub fn to_app_error(&self) -> AppError {
        match self {
            IdentityError::Database(_) | IdentityError::Internal(_) => {
                AppError::new(self.kind(), "Internal server error")
            }
            IdentityError::MissingToken | IdentityError::TokenInvalid => {
                AppError::new(self.kind(), self.to_string()).with_action("Log in again")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            IdentityError::Database(e) => {
                tracing::error!(error = %e, "Identity database error");
            }
            IdentityError::Internal(msg) => {
                tracing::error!(message = %msg, "Identity internal error");
            }
            IdentityError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Identity error");
            }
        }
    }
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<kernel::AccountAddressError> for IdentityError {
    fn from(err: kernel::AccountAddressError) -> Self {
        IdentityError::InvalidAccount(err.to_string())
    }
}

impl From<platform::password::PasswordPolicyError> for IdentityError {
    fn from(err: platform::password::PasswordPolicyError) -> Self {
        IdentityError::PasswordValidation(err.to_string())
    }
}

impl From<platform::password::PasswordHashError> for IdentityError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        IdentityError::Internal(err.to_string())
    }
}
