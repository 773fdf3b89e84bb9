//! Author model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Reserved name of the sentinel author a book falls back to when its last
/// real author is unlinked.
pub const SYSTEM_AUTHOR_NAME: &str = "anonimo";

/// Author model from database.
///
/// `name` is always stored normalized (see [`crate::normalize`]) and is
/// unique. `system` marks protected sentinel authors that can never be
/// renamed, unlinked or deleted through normal flows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub name: String,
    pub system: bool,
}

/// Create-and-link author request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAuthor {
    pub name: String,
}

/// Rename author request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RenameAuthor {
    pub name: String,
}
