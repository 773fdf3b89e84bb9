//! Books repository for database operations.
//!
//! Hosts the two multi-store orchestrations: creating a book with its
//! authors, editions and copies in one transaction, and the full cascading
//! delete that also sweeps orphaned authors. Both are all-or-nothing; any
//! failure rolls the whole transaction back.

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookDetail, CreateBookResult, DetailBookInput},
        Author, Copy, Edition, EditionWithCopies,
    },
    normalize::normalize,
    repository::{
        authors::{normalize_names, partition_missing, AuthorsRepository},
        authorships::AuthorshipsRepository,
        copies::CopiesRepository,
        editions::EditionsRepository,
    },
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READ
    // =========================================================================

    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT id, title FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// All books with authors, editions and copies attached.
    pub async fn get_many(&self) -> AppResult<Vec<BookDetail>> {
        let books = sqlx::query_as::<_, Book>("SELECT id, title FROM books ORDER BY title")
            .fetch_all(&self.pool)
            .await?;

        let mut details = Vec::with_capacity(books.len());
        for book in books {
            details.push(self.load_detail(book).await?);
        }
        Ok(details)
    }

    pub async fn get_detail(&self, id: i32) -> AppResult<BookDetail> {
        let book = self.get_by_id(id).await?;
        self.load_detail(book).await
    }

    async fn load_detail(&self, book: Book) -> AppResult<BookDetail> {
        let authors = sqlx::query_as::<_, Author>(
            r#"
            SELECT a.id, a.name, a.system
            FROM authorships ab
            JOIN authors a ON a.id = ab.author_id
            WHERE ab.book_id = $1
            ORDER BY a.name
            "#,
        )
        .bind(book.id)
        .fetch_all(&self.pool)
        .await?;

        let editions = sqlx::query_as::<_, Edition>(
            "SELECT id, book_id, isbn, language, year FROM editions \
             WHERE book_id = $1 ORDER BY year, id",
        )
        .bind(book.id)
        .fetch_all(&self.pool)
        .await?;

        let mut with_copies = Vec::with_capacity(editions.len());
        for edition in editions {
            let copies = sqlx::query_as::<_, Copy>(
                "SELECT id, edition_id, copy_number FROM copies \
                 WHERE edition_id = $1 ORDER BY copy_number",
            )
            .bind(edition.id)
            .fetch_all(&self.pool)
            .await?;
            with_copies.push(EditionWithCopies::new(edition, copies));
        }

        Ok(BookDetail {
            id: book.id,
            title: book.title,
            authors,
            editions: with_copies,
        })
    }

    pub async fn update_title(&self, id: i32, title: &str) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(
            "UPDATE books SET title = $1 WHERE id = $2 RETURNING id, title",
        )
        .bind(normalize(title))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;
        Ok(book)
    }

    // =========================================================================
    // AGGREGATE CREATE
    // =========================================================================

    /// Create a book with its authors, editions and copies in one
    /// transaction.
    ///
    /// Author names are normalized, deduplicated, and partitioned into
    /// existing vs. new by set difference; existing authors always win over
    /// creating a duplicate. A book submitted with no resolvable author is
    /// linked to the sentinel so it never exists authorless.
    pub async fn create_from_detail(&self, input: &DetailBookInput) -> AppResult<CreateBookResult> {
        let mut tx = super::begin_serializable(&self.pool).await?;

        let book_id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO books (title) VALUES ($1) RETURNING id",
        )
        .bind(normalize(&input.title))
        .fetch_one(&mut *tx)
        .await?;

        let requested = normalize_names(&input.authors);
        let existing = AuthorsRepository::find_by_names_tx(&mut tx, &requested).await?;
        let missing = partition_missing(&requested, &existing);
        let new_ids = AuthorsRepository::create_many_tx(&mut tx, &missing).await?;

        let mut author_ids: Vec<i32> = existing.iter().map(|a| a.id).collect();
        author_ids.extend(&new_ids);

        if author_ids.is_empty() {
            let sentinel = AuthorsRepository::get_system_author_tx(&mut tx).await?;
            author_ids.push(sentinel.id);
        }

        AuthorshipsRepository::create_many_tx(&mut tx, book_id, &author_ids).await?;

        let mut edition_ids = Vec::with_capacity(input.editions.len());
        for edition in &input.editions {
            let edition_id = EditionsRepository::insert_tx(
                &mut tx,
                book_id,
                &edition.isbn,
                &edition.language,
                edition.year,
            )
            .await?;
            CopiesRepository::insert_numbered_tx(&mut tx, edition_id, 1, edition.copy_count)
                .await?;
            edition_ids.push(edition_id);
        }

        tx.commit().await?;

        tracing::info!(
            "Created book {} with {} author(s) and {} edition(s)",
            book_id,
            author_ids.len(),
            edition_ids.len()
        );

        Ok(CreateBookResult {
            book_id,
            author_ids,
            edition_ids,
        })
    }

    // =========================================================================
    // CASCADE DELETE
    // =========================================================================

    /// Delete a book and everything hanging off it, children before
    /// parents: loans -> copies -> editions -> authorships -> orphaned
    /// authors -> book. System authors are never swept, whatever state the
    /// relation table is in.
    pub async fn delete_cascade(&self, book_id: i32) -> AppResult<()> {
        let mut tx = super::begin_serializable(&self.pool).await?;

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(book_id)
            .fetch_one(&mut *tx)
            .await?;
        if !exists {
            return Err(AppError::NotFound(format!("Book with id {} not found", book_id)));
        }

        // 1. Editions of the book
        let edition_ids: Vec<i32> =
            sqlx::query_scalar("SELECT id FROM editions WHERE book_id = $1")
                .bind(book_id)
                .fetch_all(&mut *tx)
                .await?;

        // 2. Copies of those editions
        let copy_ids: Vec<i32> =
            sqlx::query_scalar("SELECT id FROM copies WHERE edition_id = ANY($1)")
                .bind(&edition_ids)
                .fetch_all(&mut *tx)
                .await?;

        // 3-5. Loans, copies, editions
        sqlx::query("DELETE FROM loans WHERE copy_id = ANY($1)")
            .bind(&copy_ids)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM copies WHERE edition_id = ANY($1)")
            .bind(&edition_ids)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM editions WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        // 6-7. The book's authors, then its authorships
        let author_ids: Vec<i32> =
            sqlx::query_scalar("SELECT author_id FROM authorships WHERE book_id = $1")
                .bind(book_id)
                .fetch_all(&mut *tx)
                .await?;

        sqlx::query("DELETE FROM authorships WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        // 8. Authors with no remaining authorships anywhere are orphans;
        //    system authors are excluded unconditionally.
        let still_linked: Vec<i32> = sqlx::query_scalar(
            "SELECT DISTINCT author_id FROM authorships WHERE author_id = ANY($1)",
        )
        .bind(&author_ids)
        .fetch_all(&mut *tx)
        .await?;

        let orphan_ids: Vec<i32> = author_ids
            .iter()
            .filter(|id| !still_linked.contains(id))
            .copied()
            .collect();

        if !orphan_ids.is_empty() {
            sqlx::query("DELETE FROM authors WHERE id = ANY($1) AND system = FALSE")
                .bind(&orphan_ids)
                .execute(&mut *tx)
                .await?;
        }

        // 9. The book itself
        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Deleted book {} ({} edition(s), {} copy(ies), {} orphaned author(s))",
            book_id,
            edition_ids.len(),
            copy_ids.len(),
            orphan_ids.len()
        );

        Ok(())
    }
}
