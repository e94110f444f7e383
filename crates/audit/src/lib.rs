//! `shelfmark-audit` — append-only activity log.
//!
//! A sink, not a gate: entries are recorded after the fact and never
//! validate business rules. Each entry is scoped to one owning account and
//! snapshots the book title so history survives the book's deletion.

pub mod entry;
pub mod logger;
pub mod store;

pub use entry::{AuditAction, LogEntry};
pub use logger::AuditLogger;
pub use store::{AuditError, AuditStore, DEFAULT_HISTORY_LIMIT, InMemoryAuditStore};
