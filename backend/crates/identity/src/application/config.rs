//! Application Configuration
//!
//! Configuration for the Identity application layer.

use std::time::Duration;

use platform::token::TokenSigner;

/// Identity application configuration
#[derive(Clone)]
pub struct IdentityConfig {
    /// Request header carrying the bearer token (`Authorization: Bearer` is
    /// also accepted)
    pub token_header: String,
    /// HMAC key for token signatures
    pub token_secret: Vec<u8>,
    /// Token lifetime
    pub token_ttl: Duration,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            token_header: "jwt".to_string(),
            token_secret: vec![0u8; 32],
            token_ttl: Duration::from_secs(3600), // 1 hour
            password_pepper: None,
        }
    }
}

impl IdentityConfig {
    /// Create config with a random token secret
    pub fn with_random_secret() -> Self {
        Self {
            token_secret: platform::crypto::random_bytes(32),
            ..Default::default()
        }
    }

    /// Create config for development (random secret, tokens lost on restart)
    pub fn development() -> Self {
        Self::with_random_secret()
    }

    pub fn token_signer(&self) -> TokenSigner {
        let ttl = chrono::Duration::seconds(self.token_ttl.as_secs() as i64);
        TokenSigner::new(self.token_secret.clone(), ttl)
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("token_header", &self.token_header)
            .field("token_ttl", &self.token_ttl)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[SET]"))
            .finish_non_exhaustive()
    }
}
