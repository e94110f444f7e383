//! Book record model and field validation.
//!
//! Validation is an explicit pipeline stage (normalize → validate →
//! persist) invoked by the store's entry points, not a save-time hook.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use shelfmark_core::{AccountId, BookId, DomainError, DomainResult, Entity};

/// ISBNs shorter than this are rejected (ISBN-10 is the shortest real form).
pub const MIN_ISBN_LEN: usize = 10;

/// Oldest accepted publication year.
pub const MIN_YEAR: i32 = 1000;

/// A book record owned by exactly one account.
///
/// `owner` is immutable after creation; the store never exposes a path
/// that changes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub owner: AccountId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub year: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Book {
    type Id = BookId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Fields for a new book. All four are required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub year: i32,
}

impl BookDraft {
    /// Trim all text fields.
    pub fn normalize(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.author = self.author.trim().to_string();
        self.isbn = self.isbn.trim().to_string();
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        validate_title(&self.title)?;
        validate_author(&self.author)?;
        validate_isbn(&self.isbn)?;
        validate_year(self.year)
    }
}

/// Partial update: only supplied fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub year: Option<i32>,
}

impl BookPatch {
    pub fn normalize(mut self) -> Self {
        self.title = self.title.map(|s| s.trim().to_string());
        self.author = self.author.map(|s| s.trim().to_string());
        self.isbn = self.isbn.map(|s| s.trim().to_string());
        self
    }

    /// Validate only the fields present in the patch.
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(author) = &self.author {
            validate_author(author)?;
        }
        if let Some(isbn) = &self.isbn {
            validate_isbn(isbn)?;
        }
        if let Some(year) = self.year {
            validate_year(year)?;
        }
        Ok(())
    }

    /// Apply to an existing record, bumping `updated_at`.
    pub fn apply_to(&self, book: &mut Book, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            book.title = title.clone();
        }
        if let Some(author) = &self.author {
            book.author = author.clone();
        }
        if let Some(isbn) = &self.isbn {
            book.isbn = isbn.clone();
        }
        if let Some(year) = self.year {
            book.year = year;
        }
        book.updated_at = now;
    }
}

fn validate_title(title: &str) -> DomainResult<()> {
    if title.is_empty() {
        return Err(DomainError::validation("title cannot be empty"));
    }
    Ok(())
}

fn validate_author(author: &str) -> DomainResult<()> {
    if author.is_empty() {
        return Err(DomainError::validation("author cannot be empty"));
    }
    Ok(())
}

fn validate_isbn(isbn: &str) -> DomainResult<()> {
    if isbn.len() < MIN_ISBN_LEN {
        return Err(DomainError::validation(format!(
            "isbn must be at least {MIN_ISBN_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_year(year: i32) -> DomainResult<()> {
    let max = max_allowed_year();
    if !(MIN_YEAR..=max).contains(&year) {
        return Err(DomainError::validation(format!(
            "year must be between {MIN_YEAR} and {max}"
        )));
    }
    Ok(())
}

/// Next year is allowed: forthcoming editions carry it.
fn max_allowed_year() -> i32 {
    Utc::now().year() + 1
}
