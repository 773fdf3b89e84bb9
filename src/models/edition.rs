//! Edition model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::copy::Copy;

/// Edition model from database. `isbn` is unique across all editions.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Edition {
    pub id: i32,
    pub book_id: i32,
    pub isbn: String,
    pub language: String,
    pub year: i32,
}

/// Edition with its copies attached
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EditionWithCopies {
    pub id: i32,
    pub book_id: i32,
    pub isbn: String,
    pub language: String,
    pub year: i32,
    pub copies: Vec<Copy>,
}

impl EditionWithCopies {
    pub fn new(edition: Edition, copies: Vec<Copy>) -> Self {
        Self {
            id: edition.id,
            book_id: edition.book_id,
            isbn: edition.isbn,
            language: edition.language,
            year: edition.year,
            copies,
        }
    }
}

/// Create edition request (edition plus its initial numbered copies)
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEdition {
    pub isbn: String,
    pub language: String,
    pub year: i32,
    pub copy_count: i32,
}

/// Partial update of an edition
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEdition {
    pub isbn: Option<String>,
    pub language: Option<String>,
    pub year: Option<i32>,
}
