//! `shelfmark-auth` — credential store and session issuing.
//!
//! Accounts, bcrypt password verification, hashed single-use reset tokens,
//! and stateless HS256 session tokens. This crate is intentionally decoupled
//! from HTTP; the API layer decides how failures map to responses.

pub mod account;
pub mod password;
pub mod session;
pub mod store;

pub use account::{Account, Theme};
pub use password::{MIN_PASSWORD_LEN, hash_password, verify_password};
pub use session::{SessionClaims, SessionError, SessionIssuer, validate_claim_window};
pub use store::{AuthError, CredentialStore, InMemoryCredentialStore};
