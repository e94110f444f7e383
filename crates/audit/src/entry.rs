//! Activity log entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelfmark_core::{AccountId, Entity, LogEntryId};

/// Kind of mutation an entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Add,
    Edit,
    Delete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Add => "ADD",
            AuditAction::Edit => "EDIT",
            AuditAction::Delete => "DELETE",
        }
    }
}

impl core::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One append-only history record.
///
/// `book_title` is a denormalized snapshot taken at record time; it stays
/// valid after the book itself is gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: LogEntryId,
    pub owner: AccountId,
    pub action: AuditAction,
    pub book_title: String,
    pub description: String,
    /// Action-specific payload (e.g. prior isbn/author/year for edits).
    pub details: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}

impl Entity for LogEntry {
    type Id = LogEntryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&AuditAction::Add).unwrap(), "\"ADD\"");
        assert_eq!(
            serde_json::to_string(&AuditAction::Delete).unwrap(),
            "\"DELETE\""
        );
    }
}
