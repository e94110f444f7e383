//! Stateless session tokens (HS256 JWT).
//!
//! A token is a signed assertion of `{account id, issued-at, expires-at}`.
//! Verification needs no external state; the API gate additionally
//! re-resolves the account to catch accounts that vanished after issue.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shelfmark_core::AccountId;

/// Default session lifetime.
pub const DEFAULT_SESSION_DAYS: i64 = 30;

/// JWT claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the account this token asserts.
    pub sub: AccountId,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("token has expired")]
    Expired,

    #[error("invalid token")]
    Invalid,

    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// Deterministically validate a claim time window.
///
/// Note: this validates the *claims* only; signature verification lives in
/// [`SessionIssuer::verify`].
pub fn validate_claim_window(claims: &SessionClaims, now: DateTime<Utc>) -> Result<(), SessionError> {
    if claims.exp <= claims.iat {
        return Err(SessionError::Invalid);
    }
    if now.timestamp() >= claims.exp {
        return Err(SessionError::Expired);
    }
    Ok(())
}

/// Issues and verifies session tokens with a shared HS256 secret.
pub struct SessionIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl SessionIssuer {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            lifetime: Duration::days(DEFAULT_SESSION_DAYS),
        }
    }

    /// Override the token lifetime (tests use short or negative windows).
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Produce a signed, time-bounded token for `account_id`.
    pub fn issue(&self, account_id: AccountId) -> Result<String, SessionError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: account_id,
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| SessionError::Encoding(e.to_string()))
    }

    /// Verify signature and expiry, returning the asserted account.
    pub fn verify(&self, token: &str) -> Result<AccountId, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
                _ => SessionError::Invalid,
            })?;

        validate_claim_window(&data.claims, Utc::now())?;
        Ok(data.claims.sub)
    }
}
