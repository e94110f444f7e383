//! Ownership-scoped book storage.
//!
//! The in-memory implementation keys records by `(owner, id)` behind an
//! `RwLock`; per-owner ISBN uniqueness is checked under the write lock, so
//! concurrent writers race on the lock and the loser sees the conflict.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;

use shelfmark_core::{AccountId, BookId, DomainError, DomainResult};

use crate::book::{Book, BookDraft, BookPatch};
use crate::mutation::BookMutation;

/// CRUD over book records, always scoped by the owning account.
///
/// Reads and writes against another account's records report
/// [`DomainError::NotFound`]; existence never leaks across owners.
pub trait BookStore: Send + Sync {
    /// Full snapshot of the owner's books, newest first.
    fn list(&self, owner: AccountId) -> Vec<Book>;

    fn get(&self, owner: AccountId, id: BookId) -> DomainResult<Book>;

    /// Validate, enforce per-owner ISBN uniqueness, insert.
    fn create(&self, owner: AccountId, draft: BookDraft) -> DomainResult<(Book, BookMutation)>;

    /// Ownership check precedes field validation: a foreign or absent id is
    /// NotFound even when the patch is also malformed.
    fn update(
        &self,
        owner: AccountId,
        id: BookId,
        patch: BookPatch,
    ) -> DomainResult<(Book, BookMutation)>;

    /// Remove and return the prior state (the audit log snapshots it).
    fn delete(&self, owner: AccountId, id: BookId) -> DomainResult<(Book, BookMutation)>;
}

impl<S> BookStore for Arc<S>
where
    S: BookStore + ?Sized,
{
    fn list(&self, owner: AccountId) -> Vec<Book> {
        (**self).list(owner)
    }

    fn get(&self, owner: AccountId, id: BookId) -> DomainResult<Book> {
        (**self).get(owner, id)
    }

    fn create(&self, owner: AccountId, draft: BookDraft) -> DomainResult<(Book, BookMutation)> {
        (**self).create(owner, draft)
    }

    fn update(
        &self,
        owner: AccountId,
        id: BookId,
        patch: BookPatch,
    ) -> DomainResult<(Book, BookMutation)> {
        (**self).update(owner, id, patch)
    }

    fn delete(&self, owner: AccountId, id: BookId) -> DomainResult<(Book, BookMutation)> {
        (**self).delete(owner, id)
    }
}

/// In-memory owner-scoped store for dev/test.
#[derive(Debug, Default)]
pub struct InMemoryBookStore {
    inner: RwLock<HashMap<(AccountId, BookId), Book>>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn duplicate_isbn(
        map: &HashMap<(AccountId, BookId), Book>,
        owner: AccountId,
        isbn: &str,
        exclude: Option<BookId>,
    ) -> bool {
        map.iter().any(|((o, id), b)| {
            *o == owner && b.isbn == isbn && Some(*id) != exclude
        })
    }
}

impl BookStore for InMemoryBookStore {
    fn list(&self, owner: AccountId) -> Vec<Book> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        let mut books: Vec<Book> = map
            .iter()
            .filter_map(|((o, _), b)| (*o == owner).then(|| b.clone()))
            .collect();
        // Newest first; UUIDv7 ids break created_at ties in insert order.
        books.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        books
    }

    fn get(&self, owner: AccountId, id: BookId) -> DomainResult<Book> {
        let map = self.inner.read().map_err(|_| DomainError::NotFound)?;
        map.get(&(owner, id)).cloned().ok_or(DomainError::NotFound)
    }

    fn create(&self, owner: AccountId, draft: BookDraft) -> DomainResult<(Book, BookMutation)> {
        let draft = draft.normalize();
        draft.validate()?;

        let mut map = self.inner.write().expect("book store lock poisoned");
        if Self::duplicate_isbn(&map, owner, &draft.isbn, None) {
            return Err(DomainError::conflict("a book with this isbn already exists"));
        }

        let now = Utc::now();
        let book = Book {
            id: BookId::new(),
            owner,
            title: draft.title,
            author: draft.author,
            isbn: draft.isbn,
            year: draft.year,
            created_at: now,
            updated_at: now,
        };
        map.insert((owner, book.id), book.clone());
        Ok((book.clone(), BookMutation::added(book)))
    }

    fn update(
        &self,
        owner: AccountId,
        id: BookId,
        patch: BookPatch,
    ) -> DomainResult<(Book, BookMutation)> {
        let mut map = self.inner.write().expect("book store lock poisoned");

        // Ownership first; a foreign id must not reveal validation detail.
        let before = map.get(&(owner, id)).cloned().ok_or(DomainError::NotFound)?;

        let patch = patch.normalize();
        patch.validate()?;

        if let Some(isbn) = &patch.isbn {
            if Self::duplicate_isbn(&map, owner, isbn, Some(id)) {
                return Err(DomainError::conflict("a book with this isbn already exists"));
            }
        }

        let mut after = before.clone();
        patch.apply_to(&mut after, Utc::now());
        map.insert((owner, id), after.clone());
        Ok((after.clone(), BookMutation::edited(before, after)))
    }

    fn delete(&self, owner: AccountId, id: BookId) -> DomainResult<(Book, BookMutation)> {
        let mut map = self.inner.write().expect("book store lock poisoned");
        let book = map.remove(&(owner, id)).ok_or(DomainError::NotFound)?;
        Ok((book.clone(), BookMutation::deleted(book)))
    }
}
