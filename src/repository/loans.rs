//! Loans repository for database operations.
//!
//! The one-active-loan-per-copy rule is enforced by a partial unique index
//! on `copy_id WHERE return_date IS NULL`; a second active loan surfaces as
//! `Conflict` regardless of which caller forgot to check.

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::loan::{CreateLoan, Loan, UpdateLoan},
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>(
            "SELECT id, copy_id, patron_id, loan_date, return_date FROM loans WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    pub async fn get_many(&self) -> AppResult<Vec<Loan>> {
        let loans = sqlx::query_as::<_, Loan>(
            "SELECT id, copy_id, patron_id, loan_date, return_date FROM loans ORDER BY loan_date",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }

    /// The active (unreturned) loan for a copy, if any.
    pub async fn get_active_for_copy(&self, copy_id: i32) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(
            "SELECT id, copy_id, patron_id, loan_date, return_date FROM loans \
             WHERE copy_id = $1 AND return_date IS NULL",
        )
        .bind(copy_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(loan)
    }

    pub async fn create(&self, input: &CreateLoan) -> AppResult<Loan> {
        let loan_date = input.loan_date.unwrap_or_else(Utc::now);

        let loan = sqlx::query_as::<_, Loan>(
            "INSERT INTO loans (copy_id, patron_id, loan_date, return_date) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, copy_id, patron_id, loan_date, return_date",
        )
        .bind(input.copy_id)
        .bind(input.patron_id)
        .bind(loan_date)
        .bind(input.return_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(loan)
    }

    pub async fn update(&self, id: i32, input: &UpdateLoan) -> AppResult<Loan> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans SET
                loan_date = COALESCE($1, loan_date),
                return_date = COALESCE($2, return_date)
            WHERE id = $3
            RETURNING id, copy_id, patron_id, loan_date, return_date
            "#,
        )
        .bind(input.loan_date)
        .bind(input.return_date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))?;
        Ok(loan)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM loans WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Loan with id {} not found", id)));
        }
        Ok(())
    }
}
