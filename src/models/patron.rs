//! Patron (library member) model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Patron model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Patron {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
}

/// Create patron request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePatron {
    pub name: String,
    pub email: Option<String>,
}

/// Update patron request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePatron {
    pub name: Option<String>,
    pub email: Option<String>,
}
