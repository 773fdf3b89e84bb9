//! Catalog management service.
//!
//! Fronts the book aggregate operations and hosts the boundary rules the
//! stores deliberately leave to their callers: the last-edition refusal and
//! the copy-removal guards.

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{BookDetail, CreateBookResult, DetailBookInput},
        copy::{AddCopies, RemovalCheck},
        edition::{CreateEdition, Edition, EditionWithCopies, UpdateEdition},
        Book, Copy,
    },
    normalize::normalize,
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // =========================================================================
    // BOOKS
    // =========================================================================

    pub async fn get_books(&self) -> AppResult<Vec<BookDetail>> {
        self.repository.books.get_many().await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<BookDetail> {
        self.repository.books.get_detail(id).await
    }

    pub async fn create_book(&self, input: DetailBookInput) -> AppResult<CreateBookResult> {
        if normalize(&input.title).is_empty() {
            return Err(AppError::Validation("Book title cannot be blank".to_string()));
        }
        for edition in &input.editions {
            validate_edition_fields(&edition.isbn, edition.copy_count)?;
        }

        self.repository.books.create_from_detail(&input).await
    }

    pub async fn update_book_title(&self, id: i32, title: &str) -> AppResult<Book> {
        if normalize(title).is_empty() {
            return Err(AppError::Validation("Book title cannot be blank".to_string()));
        }
        self.repository.books.update_title(id, title).await
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete_cascade(id).await
    }

    // =========================================================================
    // EDITIONS
    // =========================================================================

    pub async fn get_edition(&self, id: i32) -> AppResult<Edition> {
        self.repository.editions.get_by_id(id).await
    }

    pub async fn get_book_editions(&self, book_id: i32) -> AppResult<Vec<Edition>> {
        // Verify book exists
        self.repository.books.get_by_id(book_id).await?;
        self.repository.editions.get_for_book(book_id).await
    }

    pub async fn create_edition(
        &self,
        book_id: i32,
        input: CreateEdition,
    ) -> AppResult<EditionWithCopies> {
        validate_edition_fields(&input.isbn, input.copy_count)?;
        self.repository.books.get_by_id(book_id).await?;
        self.repository.editions.create(book_id, &input).await
    }

    pub async fn update_edition(&self, id: i32, input: UpdateEdition) -> AppResult<Edition> {
        if let Some(ref isbn) = input.isbn {
            if isbn.trim().is_empty() {
                return Err(AppError::Validation("ISBN cannot be blank".to_string()));
            }
        }
        self.repository.editions.update(id, &input).await
    }

    /// Delete an edition and its copies/loans. A book must retain at least
    /// one edition, so the last one is refused.
    pub async fn delete_edition(&self, id: i32) -> AppResult<()> {
        let edition = self.repository.editions.get_by_id(id).await?;

        if self
            .repository
            .editions
            .is_last_edition_of_book(edition.book_id)
            .await?
        {
            return Err(AppError::Precondition(
                "Cannot delete the last edition of a book".to_string(),
            ));
        }

        self.repository.editions.delete_with_cascade(id).await
    }

    // =========================================================================
    // COPIES
    // =========================================================================

    pub async fn get_copy(&self, id: i32) -> AppResult<Copy> {
        self.repository.copies.get_by_id(id).await
    }

    pub async fn get_edition_copies(&self, edition_id: i32) -> AppResult<Vec<Copy>> {
        self.repository.editions.get_by_id(edition_id).await?;
        self.repository.copies.get_for_edition(edition_id).await
    }

    pub async fn add_copies(&self, edition_id: i32, input: AddCopies) -> AppResult<Vec<Copy>> {
        if input.count < 1 {
            return Err(AppError::Validation("Copy count must be at least 1".to_string()));
        }
        self.repository.editions.get_by_id(edition_id).await?;
        self.repository.copies.add_to_edition(edition_id, input.count).await
    }

    pub async fn can_remove_copy(&self, id: i32) -> AppResult<RemovalCheck> {
        self.repository.copies.can_remove(id).await
    }

    /// Remove a copy after running the guards; the store-level `remove`
    /// assumes they have been checked.
    pub async fn remove_copy(&self, id: i32) -> AppResult<()> {
        let check = self.repository.copies.can_remove(id).await?;
        if !check.can {
            return Err(AppError::Precondition(
                check.reason.unwrap_or_else(|| "Copy cannot be removed".to_string()),
            ));
        }
        self.repository.copies.remove(id).await
    }
}

fn validate_edition_fields(isbn: &str, copy_count: i32) -> AppResult<()> {
    if isbn.trim().is_empty() {
        return Err(AppError::Validation("ISBN cannot be blank".to_string()));
    }
    if copy_count < 1 {
        return Err(AppError::Validation(
            "An edition needs at least one copy".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_edition_fields;

    #[test]
    fn edition_fields_are_validated() {
        assert!(validate_edition_fields("978-0060883287", 3).is_ok());
        assert!(validate_edition_fields("", 3).is_err());
        assert!(validate_edition_fields("  ", 3).is_err());
        assert!(validate_edition_fields("978-0060883287", 0).is_err());
    }
}
