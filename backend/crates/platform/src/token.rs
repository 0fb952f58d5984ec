//! Signed bearer tokens
//!
//! Wire format: `<subject uuid>.<expires_at unix ms>.<signature>` where the
//! signature is unpadded base64url HMAC-SHA256 over `<subject>.<expires_at>`.
//! Tokens are stateless; revocation is by expiry only.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::crypto::{constant_time_eq, from_base64_url, hmac_sha256, to_base64_url};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token is malformed")]
    Malformed,

    #[error("Token signature is invalid")]
    BadSignature,

    #[error("Token has expired")]
    Expired,
}

/// Claims recovered from a verified token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// HMAC signer/verifier for bearer tokens
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `subject` valid for the configured TTL from `now`
    pub fn issue(&self, subject: Uuid, now: DateTime<Utc>) -> (String, DateTime<Utc>) {
        let expires_at = now + self.ttl;
        let payload = format!("{}.{}", subject, expires_at.timestamp_millis());
        let signature = to_base64_url(&hmac_sha256(&self.secret, payload.as_bytes()));
        (format!("{}.{}", payload, signature), expires_at)
    }

    /// Verify signature and expiry at `now`
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let mut parts = token.splitn(3, '.');
        let (Some(subject), Some(expires), Some(signature)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Malformed);
        };

        let provided = from_base64_url(signature).map_err(|_| TokenError::Malformed)?;
        let payload = &token[..subject.len() + 1 + expires.len()];
        let expected = hmac_sha256(&self.secret, payload.as_bytes());
        if !constant_time_eq(&provided, &expected) {
            return Err(TokenError::BadSignature);
        }

        let subject = Uuid::parse_str(subject).map_err(|_| TokenError::Malformed)?;
        let expires_ms: i64 = expires.parse().map_err(|_| TokenError::Malformed)?;
        let expires_at =
            DateTime::<Utc>::from_timestamp_millis(expires_ms).ok_or(TokenError::Malformed)?;

        if now >= expires_at {
            return Err(TokenError::Expired);
        }

        Ok(TokenClaims {
            subject,
            expires_at,
        })
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new(b"0123456789abcdef0123456789abcdef".to_vec(), Duration::hours(1))
    }

    #[test]
    fn test_issue_and_verify() {
        let signer = signer();
        let subject = Uuid::new_v4();
        let now = Utc::now();
        let (token, expires_at) = signer.issue(subject, now);

        assert_eq!(token.split('.').count(), 3);
        let claims = signer.verify(&token, now).unwrap();
        assert_eq!(claims.subject, subject);
        assert_eq!(claims.expires_at.timestamp_millis(), expires_at.timestamp_millis());
    }

    #[test]
    fn test_expired() {
        let signer = signer();
        let now = Utc::now();
        let (token, _) = signer.issue(Uuid::new_v4(), now);
        assert_eq!(
            signer.verify(&token, now + Duration::hours(1)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_tampered_subject_rejected() {
        let signer = signer();
        let now = Utc::now();
        let (token, _) = signer.issue(Uuid::new_v4(), now);
        let (_, rest) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", Uuid::new_v4(), rest);
        assert_eq!(signer.verify(&forged, now), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_other_secret_rejected() {
        let now = Utc::now();
        let (token, _) = signer().issue(Uuid::new_v4(), now);
        let other = TokenSigner::new(b"another secret".to_vec(), Duration::hours(1));
        assert_eq!(other.verify(&token, now), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_malformed() {
        let signer = signer();
        let now = Utc::now();
        assert_eq!(signer.verify("", now), Err(TokenError::Malformed));
        assert_eq!(signer.verify("a.b", now), Err(TokenError::Malformed));
        assert_eq!(signer.verify("a.b.!!!", now), Err(TokenError::Malformed));
    }
}
