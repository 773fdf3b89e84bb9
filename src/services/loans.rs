//! Loan and patron management service

use crate::{
    error::AppResult,
    models::{
        loan::{CreateLoan, Loan, UpdateLoan},
        patron::{CreatePatron, Patron, UpdatePatron},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_loans(&self) -> AppResult<Vec<Loan>> {
        self.repository.loans.get_many().await
    }

    pub async fn get_loan(&self, id: i32) -> AppResult<Loan> {
        self.repository.loans.get_by_id(id).await
    }

    /// Lend a copy to a patron. The store's partial unique index rejects a
    /// second active loan for the same copy with `Conflict`.
    pub async fn create_loan(&self, input: CreateLoan) -> AppResult<Loan> {
        // Verify both ends exist so a dangling id maps to 404, not 500
        self.repository.patrons.get_by_id(input.patron_id).await?;
        self.repository.copies.get_by_id(input.copy_id).await?;
        self.repository.loans.create(&input).await
    }

    pub async fn update_loan(&self, id: i32, input: UpdateLoan) -> AppResult<Loan> {
        self.repository.loans.update(id, &input).await
    }

    pub async fn delete_loan(&self, id: i32) -> AppResult<()> {
        self.repository.loans.delete(id).await
    }

    pub async fn get_active_for_copy(&self, copy_id: i32) -> AppResult<Option<Loan>> {
        self.repository.copies.get_by_id(copy_id).await?;
        self.repository.loans.get_active_for_copy(copy_id).await
    }

    // Patron operations are part of the loans service

    pub async fn get_patrons(&self) -> AppResult<Vec<Patron>> {
        self.repository.patrons.get_many().await
    }

    pub async fn get_patron(&self, id: i32) -> AppResult<Patron> {
        self.repository.patrons.get_by_id(id).await
    }

    pub async fn create_patron(&self, input: CreatePatron) -> AppResult<Patron> {
        self.repository.patrons.create(&input).await
    }

    pub async fn update_patron(&self, id: i32, input: UpdatePatron) -> AppResult<Patron> {
        self.repository.patrons.update(id, &input).await
    }

    pub async fn delete_patron(&self, id: i32) -> AppResult<()> {
        self.repository.patrons.delete(id).await
    }
}
