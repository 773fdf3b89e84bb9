//! Copy (physical lendable unit) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// One physical copy of an edition. Unique on `(edition_id, copy_number)`;
/// new numbers continue after the highest one currently assigned.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Copy {
    pub id: i32,
    pub edition_id: i32,
    pub copy_number: i32,
}

/// Add-copies request
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCopies {
    pub count: i32,
}

/// Outcome of a copy-removal guard check
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RemovalCheck {
    pub can: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl RemovalCheck {
    pub fn allowed() -> Self {
        Self { can: true, reason: None }
    }

    pub fn refused(reason: impl Into<String>) -> Self {
        Self {
            can: false,
            reason: Some(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RemovalCheck;

    #[test]
    fn refused_carries_a_reason() {
        let check = RemovalCheck::refused("active loan");
        assert!(!check.can);
        assert_eq!(check.reason.as_deref(), Some("active loan"));
        assert!(RemovalCheck::allowed().reason.is_none());
    }
}
