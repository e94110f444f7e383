//! Password hashing pipeline stage.
//!
//! Explicit functions rather than save-time hooks: callers validate, then
//! hash, then persist, in that order.

use crate::store::AuthError;

/// Minimum raw password length accepted at registration and reset.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Hash a raw password with bcrypt.
///
/// `bcrypt::DEFAULT_COST` is work factor 12, enough to resist offline
/// brute force on leaked hashes.
pub fn hash_password(raw: &str) -> Result<String, AuthError> {
    bcrypt::hash(raw, bcrypt::DEFAULT_COST).map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Compare a raw password against a stored bcrypt hash.
///
/// Hash-format errors are folded into "no match" so a corrupt stored hash
/// behaves like a wrong password rather than an oracle.
pub fn verify_password(raw: &str, hash: &str) -> bool {
    bcrypt::verify(raw, hash).unwrap_or(false)
}
