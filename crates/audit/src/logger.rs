//! Derives log entries from catalog mutation events.

use chrono::Utc;
use serde_json::json;

use shelfmark_catalog::{Book, BookMutation, MutationKind};
use shelfmark_core::{AccountId, LogEntryId};

use crate::entry::{AuditAction, LogEntry};
use crate::store::{AuditError, AuditStore, DEFAULT_HISTORY_LIMIT};

/// Front door of the audit log: turns mutations into entries and answers
/// history queries.
pub struct AuditLogger<S> {
    store: S,
}

impl<S: AuditStore> AuditLogger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record an arbitrary entry. No business validation; this is a sink.
    pub fn record(
        &self,
        owner: AccountId,
        action: AuditAction,
        book_title: impl Into<String>,
        description: impl Into<String>,
        details: serde_json::Value,
    ) -> Result<LogEntry, AuditError> {
        self.store.append(LogEntry {
            id: LogEntryId::new(),
            owner,
            action,
            book_title: book_title.into(),
            description: description.into(),
            details,
            recorded_at: Utc::now(),
        })
    }

    /// Record one entry for a book mutation, deriving the action kind,
    /// title snapshot, description, and detail payload from the event.
    pub fn record_mutation(&self, mutation: &BookMutation) -> Result<LogEntry, AuditError> {
        let action = action_for(mutation.kind);
        let title = mutation.book_title().to_string();
        let description = describe(mutation, &title);
        let details = details_for(mutation);
        self.record(mutation.owner, action, title, description, details)
    }

    /// Newest-first history, capped at `limit` (or the default of 50).
    pub fn history(&self, owner: AccountId, limit: Option<usize>) -> Vec<LogEntry> {
        self.store.history(owner, limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
    }

    /// Irreversibly drop the owner's entire history.
    pub fn clear(&self, owner: AccountId) {
        self.store.clear(owner)
    }
}

fn action_for(kind: MutationKind) -> AuditAction {
    match kind {
        MutationKind::Added => AuditAction::Add,
        MutationKind::Edited => AuditAction::Edit,
        MutationKind::Deleted => AuditAction::Delete,
    }
}

fn describe(mutation: &BookMutation, title: &str) -> String {
    match mutation.kind {
        MutationKind::Added => match &mutation.after {
            Some(book) => format!("Added '{title}' by {}", book.author),
            None => format!("Added '{title}'"),
        },
        MutationKind::Edited => format!("Updated '{title}'"),
        MutationKind::Deleted => format!("Deleted '{title}'"),
    }
}

/// ADD carries the new bibliographic fields, EDIT the prior values of the
/// fields that changed, DELETE the full last-known state.
fn details_for(mutation: &BookMutation) -> serde_json::Value {
    match (mutation.kind, &mutation.before, &mutation.after) {
        (MutationKind::Added, _, Some(after)) => json!({
            "isbn": after.isbn,
            "author": after.author,
            "year": after.year,
        }),
        (MutationKind::Edited, Some(before), Some(after)) => {
            let mut prior = serde_json::Map::new();
            if before.title != after.title {
                prior.insert("title".to_string(), json!(before.title));
            }
            if before.author != after.author {
                prior.insert("author".to_string(), json!(before.author));
            }
            if before.isbn != after.isbn {
                prior.insert("isbn".to_string(), json!(before.isbn));
            }
            if before.year != after.year {
                prior.insert("year".to_string(), json!(before.year));
            }
            json!({ "prior": prior })
        }
        (MutationKind::Deleted, Some(before), _) => snapshot(before),
        // Malformed event shapes degrade to an empty payload rather than
        // failing the append.
        _ => json!({}),
    }
}

fn snapshot(book: &Book) -> serde_json::Value {
    json!({
        "title": book.title,
        "author": book.author,
        "isbn": book.isbn,
        "year": book.year,
    })
}
