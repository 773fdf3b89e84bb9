//! Authorship (Book <-> Author join) repository.
//!
//! Pure set membership over the `authorships` table; uniqueness on
//! `(book_id, author_id)` is enforced by the store and surfaces as
//! `Conflict`. The associated `*_tx` functions run inside a caller-owned
//! transaction so multi-step cascades stay atomic.

use sqlx::{Pool, Postgres, Transaction};

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct AuthorshipsRepository {
    pool: Pool<Postgres>,
}

impl AuthorshipsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Link a set of authors to one book inside the caller's transaction.
    pub async fn create_many_tx(
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
        author_ids: &[i32],
    ) -> AppResult<()> {
        for author_id in author_ids {
            sqlx::query("INSERT INTO authorships (book_id, author_id) VALUES ($1, $2)")
                .bind(book_id)
                .bind(author_id)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }

    /// Remove one link inside the caller's transaction. `NotFound` when the
    /// pair is not linked.
    pub async fn delete_tx(
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
        author_id: i32,
    ) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authorships WHERE book_id = $1 AND author_id = $2")
            .bind(book_id)
            .bind(author_id)
            .execute(&mut **tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Author {} is not linked to book {}",
                author_id, book_id
            )));
        }
        Ok(())
    }

    pub async fn exists_for_book_tx(
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
    ) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authorships WHERE book_id = $1)")
                .bind(book_id)
                .fetch_one(&mut **tx)
                .await?;
        Ok(exists)
    }

    pub async fn exists_for_author_tx(
        tx: &mut Transaction<'_, Postgres>,
        author_id: i32,
    ) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authorships WHERE author_id = $1)")
                .bind(author_id)
                .fetch_one(&mut **tx)
                .await?;
        Ok(exists)
    }

    /// Check whether a book has at least one authorship.
    pub async fn exists_for_book(&self, book_id: i32) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authorships WHERE book_id = $1)")
                .bind(book_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Check whether an author is linked to any book.
    pub async fn exists_for_author(&self, author_id: i32) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authorships WHERE author_id = $1)")
                .bind(author_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}
