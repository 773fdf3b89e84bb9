//! Editions repository for database operations.
//!
//! An edition is created together with its initial numbered copies in one
//! transaction; deleting one cascades loans -> copies -> edition. The
//! last-edition-of-a-book refusal lives in the catalog service, not here.

use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::edition::{CreateEdition, Edition, EditionWithCopies, UpdateEdition},
    models::Copy,
    repository::copies::CopiesRepository,
};

#[derive(Clone)]
pub struct EditionsRepository {
    pool: Pool<Postgres>,
}

impl EditionsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert one edition row inside the caller's transaction. ISBN
    /// collisions surface as `Conflict` via the unique index.
    pub async fn insert_tx(
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
        isbn: &str,
        language: &str,
        year: i32,
    ) -> AppResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO editions (book_id, isbn, language, year) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(book_id)
        .bind(isbn)
        .bind(language)
        .bind(year)
        .fetch_one(&mut **tx)
        .await?;
        Ok(id)
    }

    /// Create an edition and its copies numbered 1..=copy_count, atomically.
    pub async fn create(&self, book_id: i32, input: &CreateEdition) -> AppResult<EditionWithCopies> {
        let mut tx = self.pool.begin().await?;

        let id = Self::insert_tx(&mut tx, book_id, &input.isbn, &input.language, input.year).await?;
        let copy_ids = CopiesRepository::insert_numbered_tx(&mut tx, id, 1, input.copy_count).await?;

        tx.commit().await?;

        let edition = Edition {
            id,
            book_id,
            isbn: input.isbn.clone(),
            language: input.language.clone(),
            year: input.year,
        };
        let copies = copy_ids
            .into_iter()
            .enumerate()
            .map(|(i, copy_id)| Copy {
                id: copy_id,
                edition_id: id,
                copy_number: 1 + i as i32,
            })
            .collect();

        Ok(EditionWithCopies::new(edition, copies))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Edition> {
        sqlx::query_as::<_, Edition>(
            "SELECT id, book_id, isbn, language, year FROM editions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Edition with id {} not found", id)))
    }

    pub async fn get_for_book(&self, book_id: i32) -> AppResult<Vec<Edition>> {
        let editions = sqlx::query_as::<_, Edition>(
            "SELECT id, book_id, isbn, language, year FROM editions \
             WHERE book_id = $1 ORDER BY year, id",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(editions)
    }

    /// Partial update of isbn/language/year
    pub async fn update(&self, id: i32, input: &UpdateEdition) -> AppResult<Edition> {
        let updated = sqlx::query_as::<_, Edition>(
            r#"
            UPDATE editions SET
                isbn = COALESCE($1, isbn),
                language = COALESCE($2, language),
                year = COALESCE($3, year)
            WHERE id = $4
            RETURNING id, book_id, isbn, language, year
            "#,
        )
        .bind(input.isbn.as_deref())
        .bind(input.language.as_deref())
        .bind(input.year)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Edition with id {} not found", id)))?;
        Ok(updated)
    }

    /// Whether the book would be left without editions if this one went.
    pub async fn is_last_edition_of_book(&self, book_id: i32) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM editions WHERE book_id = $1")
            .bind(book_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count <= 1)
    }

    /// Delete an edition with everything hanging off it: loans of its
    /// copies, then the copies, then the edition. Unconditional once
    /// invoked; callers enforce the last-edition rule first.
    pub async fn delete_with_cascade(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM loans WHERE copy_id IN (SELECT id FROM copies WHERE edition_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM copies WHERE edition_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM editions WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
