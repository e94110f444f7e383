//! Account model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelfmark_core::{AccountId, Entity};

/// UI theme preference. A fixed enumeration; anything else is a
/// validation failure at the API edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl core::fmt::Display for Theme {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered account.
///
/// # Invariants
/// - `email` is stored trimmed and lowercased; uniqueness is checked on
///   that normalized form.
/// - `password_hash` is a bcrypt hash, never the raw password.
/// - Reset-token fields hold only a SHA-256 digest of the raw token;
///   the raw token leaves the process exactly once, at issue time.
///
/// Deliberately not `Serialize`: outward representations are built
/// explicitly by the API layer so the hash and reset fields cannot leak
/// through a derive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub theme: Theme,
    pub reset_token_digest: Option<String>,
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
