//! Credential store: account registration, verification, preferences, and
//! password-reset tokens.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;

use shelfmark_core::AccountId;

use crate::account::{Account, Theme};
use crate::password::{MIN_PASSWORD_LEN, hash_password, verify_password};

/// Reset tokens are valid for one hour from issue.
pub const RESET_TOKEN_TTL_HOURS: i64 = 1;

const RESET_TOKEN_BYTES: usize = 32;

/// Credential-layer error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("an account with this email already exists")]
    DuplicateEmail,

    #[error("validation failed: {0}")]
    Validation(String),

    /// Covers both "no such email" and "wrong password"; callers must not
    /// be able to tell which.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid or expired reset token")]
    InvalidOrExpiredToken,

    #[error("account not found")]
    NotFound,

    /// Infrastructure fault in the hashing backend.
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

impl AuthError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Account storage + credential verification.
///
/// Password material crosses this boundary raw exactly once per call and
/// is stored only as a bcrypt hash.
pub trait CredentialStore: Send + Sync {
    /// Create an account. Email uniqueness is case-insensitive.
    fn register(&self, name: &str, email: &str, raw_password: &str) -> Result<Account, AuthError>;

    /// Look up by email and compare the password hash. Both failure modes
    /// collapse into [`AuthError::InvalidCredentials`].
    fn verify(&self, email: &str, raw_password: &str) -> Result<Account, AuthError>;

    /// Update the theme preference.
    fn set_theme(&self, account_id: AccountId, theme: Theme) -> Result<Account, AuthError>;

    /// Start a password reset: store a digest + expiry on the account and
    /// return the raw token. The raw form is never persisted.
    fn issue_reset_token(&self, email: &str) -> Result<String, AuthError>;

    /// Redeem a reset token: replace the password hash and clear the token
    /// fields in one step, so a token is never usable twice.
    fn consume_reset_token(&self, raw_token: &str, new_password: &str)
    -> Result<Account, AuthError>;

    /// Resolve an account by id (used by the authorization gate).
    fn find(&self, account_id: AccountId) -> Option<Account>;
}

impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    fn register(&self, name: &str, email: &str, raw_password: &str) -> Result<Account, AuthError> {
        (**self).register(name, email, raw_password)
    }

    fn verify(&self, email: &str, raw_password: &str) -> Result<Account, AuthError> {
        (**self).verify(email, raw_password)
    }

    fn set_theme(&self, account_id: AccountId, theme: Theme) -> Result<Account, AuthError> {
        (**self).set_theme(account_id, theme)
    }

    fn issue_reset_token(&self, email: &str) -> Result<String, AuthError> {
        (**self).issue_reset_token(email)
    }

    fn consume_reset_token(
        &self,
        raw_token: &str,
        new_password: &str,
    ) -> Result<Account, AuthError> {
        (**self).consume_reset_token(raw_token, new_password)
    }

    fn find(&self, account_id: AccountId) -> Option<Account> {
        (**self).find(account_id)
    }
}

/// In-memory credential store for dev/test.
pub struct InMemoryCredentialStore {
    inner: RwLock<HashMap<AccountId, Account>>,
    reset_ttl: Duration,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            reset_ttl: Duration::hours(RESET_TOKEN_TTL_HOURS),
        }
    }

    /// Override the reset-token lifetime (tests use negative windows).
    pub fn with_reset_ttl(mut self, ttl: Duration) -> Self {
        self.reset_ttl = ttl;
        self
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn register(&self, name: &str, email: &str, raw_password: &str) -> Result<Account, AuthError> {
        let name = name.trim();
        let email = normalize_email(email);

        if name.is_empty() {
            return Err(AuthError::validation("name cannot be empty"));
        }
        validate_email(&email)?;
        validate_password(raw_password)?;

        // Hash outside the lock; bcrypt at cost 12 is deliberately slow.
        let password_hash = hash_password(raw_password)?;

        let mut map = self.inner.write().expect("credential store lock poisoned");
        if map.values().any(|a| a.email == email) {
            return Err(AuthError::DuplicateEmail);
        }

        let account = Account {
            id: AccountId::new(),
            name: name.to_string(),
            email,
            password_hash,
            theme: Theme::default(),
            reset_token_digest: None,
            reset_token_expires_at: None,
            created_at: Utc::now(),
        };
        map.insert(account.id, account.clone());
        Ok(account)
    }

    fn verify(&self, email: &str, raw_password: &str) -> Result<Account, AuthError> {
        let email = normalize_email(email);

        let account = {
            let map = self.inner.read().expect("credential store lock poisoned");
            map.values().find(|a| a.email == email).cloned()
        };

        match account {
            Some(account) if verify_password(raw_password, &account.password_hash) => Ok(account),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    fn set_theme(&self, account_id: AccountId, theme: Theme) -> Result<Account, AuthError> {
        let mut map = self.inner.write().expect("credential store lock poisoned");
        let account = map.get_mut(&account_id).ok_or(AuthError::NotFound)?;
        account.theme = theme;
        Ok(account.clone())
    }

    fn issue_reset_token(&self, email: &str) -> Result<String, AuthError> {
        let email = normalize_email(email);

        let mut token_bytes = [0u8; RESET_TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut token_bytes);
        let raw_token = hex::encode(token_bytes);
        let digest = digest_token(&raw_token);

        let mut map = self.inner.write().expect("credential store lock poisoned");
        let account = map
            .values_mut()
            .find(|a| a.email == email)
            .ok_or(AuthError::NotFound)?;

        account.reset_token_digest = Some(digest);
        account.reset_token_expires_at = Some(Utc::now() + self.reset_ttl);
        Ok(raw_token)
    }

    fn consume_reset_token(
        &self,
        raw_token: &str,
        new_password: &str,
    ) -> Result<Account, AuthError> {
        validate_password(new_password)?;
        let digest = digest_token(raw_token);
        let now = Utc::now();

        // Match, expiry check, re-hash, and field clearing all happen under
        // one write lock: a token can never be redeemed twice.
        let mut map = self.inner.write().expect("credential store lock poisoned");
        let account = map
            .values_mut()
            .find(|a| a.reset_token_digest.as_deref() == Some(digest.as_str()))
            .ok_or(AuthError::InvalidOrExpiredToken)?;

        match account.reset_token_expires_at {
            Some(expires_at) if now < expires_at => {}
            _ => return Err(AuthError::InvalidOrExpiredToken),
        }

        account.password_hash = hash_password(new_password)?;
        account.reset_token_digest = None;
        account.reset_token_expires_at = None;
        Ok(account.clone())
    }

    fn find(&self, account_id: AccountId) -> Option<Account> {
        let map = self.inner.read().ok()?;
        map.get(&account_id).cloned()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(AuthError::validation("invalid email format"))
    }
}

fn validate_password(raw: &str) -> Result<(), AuthError> {
    if raw.len() < MIN_PASSWORD_LEN {
        return Err(AuthError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn digest_token(raw_token: &str) -> String {
    hex::encode(Sha256::digest(raw_token.as_bytes()))
}
