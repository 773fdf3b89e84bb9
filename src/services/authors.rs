//! Author management service

use crate::{
    error::AppResult,
    models::Author,
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_authors(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.get_many().await
    }

    pub async fn get_author(&self, id: i32) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await
    }

    /// Find-or-create an author and link it to a book.
    pub async fn create_and_link(&self, name: &str, book_id: i32) -> AppResult<Author> {
        // Verify book exists
        self.repository.books.get_by_id(book_id).await?;
        self.repository.authors.create_and_link(name, book_id).await
    }

    pub async fn rename(&self, id: i32, new_name: &str) -> AppResult<Author> {
        self.repository.authors.rename(id, new_name).await
    }

    /// Unlink an author from a book, with sentinel fallback and orphan
    /// cleanup handled by the store.
    pub async fn unlink_from_book(&self, author_id: i32, book_id: i32) -> AppResult<()> {
        self.repository.books.get_by_id(book_id).await?;
        self.repository.authors.unlink_from_book(author_id, book_id).await
    }
}
