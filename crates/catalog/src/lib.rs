//! `shelfmark-catalog` — the ownership-scoped book store.
//!
//! Every operation takes the owning account as its first parameter and
//! filters by `(owner, id)`; a book that belongs to someone else is
//! indistinguishable from one that does not exist. Successful mutations
//! yield a [`BookMutation`] event for the audit log.

pub mod book;
pub mod mutation;
pub mod store;

pub use book::{Book, BookDraft, BookPatch, MIN_ISBN_LEN, MIN_YEAR};
pub use mutation::{BookMutation, MutationKind};
pub use store::{BookStore, InMemoryBookStore};
