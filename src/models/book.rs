//! Book model and aggregate input/output types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::author::Author;
use super::edition::EditionWithCopies;

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
}

/// Book with its authors and editions (copies included) attached
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetail {
    pub id: i32,
    pub title: String,
    pub authors: Vec<Author>,
    pub editions: Vec<EditionWithCopies>,
}

/// Input for creating a book together with its authors, editions and copies
/// in a single transaction.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DetailBookInput {
    pub title: String,
    /// Raw author names; normalized and deduplicated before resolution.
    pub authors: Vec<String>,
    pub editions: Vec<EditionInput>,
}

/// One edition of the detail-create input
#[derive(Debug, Deserialize, ToSchema)]
pub struct EditionInput {
    pub isbn: String,
    pub language: String,
    pub year: i32,
    pub copy_count: i32,
}

/// Ids generated by a detail create
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateBookResult {
    pub book_id: i32,
    pub author_ids: Vec<i32>,
    pub edition_ids: Vec<i32>,
}

/// Update book request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBook {
    pub title: String,
}
