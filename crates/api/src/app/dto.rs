//! Request DTOs and JSON mapping helpers.
//!
//! Outward account representations are built here by hand so the password
//! hash and reset-token fields can never ride along.

use serde::Deserialize;

use shelfmark_audit::LogEntry;
use shelfmark_auth::Account;
use shelfmark_catalog::Book;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ThemeRequest {
    pub theme: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn user_to_json(account: &Account) -> serde_json::Value {
    serde_json::json!({
        "id": account.id.to_string(),
        "name": account.name,
        "email": account.email,
        "theme": account.theme.as_str(),
        "created_at": account.created_at.to_rfc3339(),
    })
}

pub fn book_to_json(book: &Book) -> serde_json::Value {
    serde_json::json!({
        "id": book.id.to_string(),
        "title": book.title,
        "author": book.author,
        "isbn": book.isbn,
        "year": book.year,
        "created_at": book.created_at.to_rfc3339(),
        "updated_at": book.updated_at.to_rfc3339(),
    })
}

pub fn log_entry_to_json(entry: &LogEntry) -> serde_json::Value {
    serde_json::json!({
        "id": entry.id.to_string(),
        "action": entry.action.as_str(),
        "book_title": entry.book_title,
        "description": entry.description,
        "details": entry.details,
        "recorded_at": entry.recorded_at.to_rfc3339(),
    })
}
