//! Loan model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Loan model from database. `return_date` null means the loan is active;
/// at most one active loan may exist per copy (partial unique index).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub copy_id: i32,
    pub patron_id: i32,
    pub loan_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
}

impl Loan {
    pub fn is_active(&self) -> bool {
        self.return_date.is_none()
    }
}

/// Create loan request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLoan {
    pub copy_id: i32,
    pub patron_id: i32,
    pub loan_date: Option<DateTime<Utc>>,
    pub return_date: Option<DateTime<Utc>>,
}

/// Partial update of a loan (typically recording the return date)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLoan {
    pub loan_date: Option<DateTime<Utc>>,
    pub return_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loan_is_active_until_returned() {
        let mut loan = Loan {
            id: 1,
            copy_id: 1,
            patron_id: 1,
            loan_date: Utc::now(),
            return_date: None,
        };
        assert!(loan.is_active());

        loan.return_date = Some(Utc::now());
        assert!(!loan.is_active());
    }
}
