//! Service wiring: stores + the mutate-then-audit hand-off.

use std::sync::Arc;

use shelfmark_audit::{AuditLogger, AuditStore, InMemoryAuditStore, LogEntry};
use shelfmark_auth::{CredentialStore, InMemoryCredentialStore, SessionIssuer};
use shelfmark_catalog::{
    Book, BookDraft, BookMutation, BookPatch, BookStore, InMemoryBookStore,
};
use shelfmark_core::{AccountId, BookId, DomainResult};

/// Shared application services behind the HTTP handlers.
pub struct AppServices {
    pub accounts: Arc<dyn CredentialStore>,
    pub sessions: Arc<SessionIssuer>,
    books: Arc<dyn BookStore>,
    audit: AuditLogger<Arc<dyn AuditStore>>,
}

/// In-memory wiring (the only storage backend in scope; the store traits
/// are the seam for anything durable).
pub fn build_services(jwt_secret: String) -> AppServices {
    let accounts: Arc<dyn CredentialStore> = Arc::new(InMemoryCredentialStore::new());
    let sessions = Arc::new(SessionIssuer::new(jwt_secret.as_bytes()));
    let books: Arc<dyn BookStore> = Arc::new(InMemoryBookStore::new());
    let audit_store: Arc<dyn AuditStore> = Arc::new(InMemoryAuditStore::new());

    AppServices {
        accounts,
        sessions,
        books,
        audit: AuditLogger::new(audit_store),
    }
}

impl AppServices {
    pub fn list_books(&self, owner: AccountId) -> Vec<Book> {
        self.books.list(owner)
    }

    pub fn get_book(&self, owner: AccountId, id: BookId) -> DomainResult<Book> {
        self.books.get(owner, id)
    }

    pub fn create_book(&self, owner: AccountId, draft: BookDraft) -> DomainResult<Book> {
        let (book, mutation) = self.books.create(owner, draft)?;
        self.record_audit(&mutation);
        Ok(book)
    }

    pub fn update_book(
        &self,
        owner: AccountId,
        id: BookId,
        patch: BookPatch,
    ) -> DomainResult<Book> {
        let (book, mutation) = self.books.update(owner, id, patch)?;
        self.record_audit(&mutation);
        Ok(book)
    }

    pub fn delete_book(&self, owner: AccountId, id: BookId) -> DomainResult<Book> {
        let (book, mutation) = self.books.delete(owner, id)?;
        self.record_audit(&mutation);
        Ok(book)
    }

    pub fn history(&self, owner: AccountId, limit: Option<usize>) -> Vec<LogEntry> {
        self.audit.history(owner, limit)
    }

    pub fn clear_history(&self, owner: AccountId) {
        self.audit.clear(owner)
    }

    /// Best-effort audit: the mutation has already committed and stays
    /// authoritative; an append failure is logged, never surfaced.
    fn record_audit(&self, mutation: &BookMutation) {
        if let Err(e) = self.audit.record_mutation(mutation) {
            tracing::warn!(
                owner = %mutation.owner,
                kind = mutation.kind.event_type(),
                "audit append failed after committed mutation: {e}"
            );
        }
    }
}
