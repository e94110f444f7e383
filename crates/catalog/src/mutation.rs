//! Mutation events emitted by the book store.
//!
//! Events are immutable facts: each successful create/update/delete yields
//! exactly one, consumed synchronously by the audit logger on the same
//! request path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelfmark_core::AccountId;

use crate::book::Book;

/// What happened to a book record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MutationKind {
    Added,
    Edited,
    Deleted,
}

impl MutationKind {
    /// Stable event name (e.g. "catalog.book.added").
    pub fn event_type(&self) -> &'static str {
        match self {
            MutationKind::Added => "catalog.book.added",
            MutationKind::Edited => "catalog.book.edited",
            MutationKind::Deleted => "catalog.book.deleted",
        }
    }
}

/// A single mutation of one book record, with before/after snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMutation {
    pub kind: MutationKind,
    pub owner: AccountId,
    /// Prior state; absent for creates.
    pub before: Option<Book>,
    /// Resulting state; absent for deletes.
    pub after: Option<Book>,
    pub occurred_at: DateTime<Utc>,
}

impl BookMutation {
    pub fn added(book: Book) -> Self {
        Self {
            kind: MutationKind::Added,
            owner: book.owner,
            before: None,
            after: Some(book),
            occurred_at: Utc::now(),
        }
    }

    pub fn edited(before: Book, after: Book) -> Self {
        Self {
            kind: MutationKind::Edited,
            owner: after.owner,
            before: Some(before),
            after: Some(after),
            occurred_at: Utc::now(),
        }
    }

    pub fn deleted(book: Book) -> Self {
        Self {
            kind: MutationKind::Deleted,
            owner: book.owner,
            before: Some(book),
            after: None,
            occurred_at: Utc::now(),
        }
    }

    /// Title of the affected book, preferring the resulting state.
    pub fn book_title(&self) -> &str {
        self.after
            .as_ref()
            .or(self.before.as_ref())
            .map(|b| b.title.as_str())
            .unwrap_or("")
    }
}
