//! Append-only, account-scoped log storage.

use std::sync::{Arc, RwLock};

use thiserror::Error;

use shelfmark_core::AccountId;

use crate::entry::LogEntry;

/// Default cap for history queries.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Infrastructure fault in the log backend. Domain rules are never
/// checked here.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit append failed: {0}")]
    Append(String),
}

/// Storage contract for activity log entries.
pub trait AuditStore: Send + Sync {
    /// Append one entry (append-only; entries are never edited).
    fn append(&self, entry: LogEntry) -> Result<LogEntry, AuditError>;

    /// The owner's entries, newest first, capped at `limit`.
    fn history(&self, owner: AccountId, limit: usize) -> Vec<LogEntry>;

    /// Drop every entry owned by `owner`. Irreversible.
    fn clear(&self, owner: AccountId);
}

impl<S> AuditStore for Arc<S>
where
    S: AuditStore + ?Sized,
{
    fn append(&self, entry: LogEntry) -> Result<LogEntry, AuditError> {
        (**self).append(entry)
    }

    fn history(&self, owner: AccountId, limit: usize) -> Vec<LogEntry> {
        (**self).history(owner, limit)
    }

    fn clear(&self, owner: AccountId) {
        (**self).clear(owner)
    }
}

/// In-memory log store for dev/test.
#[derive(Debug, Default)]
pub struct InMemoryAuditStore {
    inner: RwLock<Vec<LogEntry>>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditStore for InMemoryAuditStore {
    fn append(&self, entry: LogEntry) -> Result<LogEntry, AuditError> {
        let mut log = self
            .inner
            .write()
            .map_err(|_| AuditError::Append("log lock poisoned".to_string()))?;
        log.push(entry.clone());
        Ok(entry)
    }

    fn history(&self, owner: AccountId, limit: usize) -> Vec<LogEntry> {
        let log = match self.inner.read() {
            Ok(l) => l,
            Err(_) => return vec![],
        };

        let mut entries: Vec<LogEntry> = log.iter().filter(|e| e.owner == owner).cloned().collect();
        entries.sort_by(|a, b| (b.recorded_at, b.id).cmp(&(a.recorded_at, a.id)));
        entries.truncate(limit);
        entries
    }

    fn clear(&self, owner: AccountId) {
        if let Ok(mut log) = self.inner.write() {
            log.retain(|e| e.owner != owner);
        }
    }
}
