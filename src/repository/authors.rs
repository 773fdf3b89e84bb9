//! Authors repository for database operations.
//!
//! Author names are stored normalized and unique; the sentinel `anonimo`
//! author (`system = true`) is seeded at startup and stands in for books
//! left without any real author. Unlinking runs the full orphan-cleanup
//! cycle in one transaction.

use sqlx::{Pool, Postgres, Transaction};
use std::collections::HashSet;

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, SYSTEM_AUTHOR_NAME},
    normalize::normalize,
    repository::authorships::AuthorshipsRepository,
};

/// Among `requested` (already normalized, deduplicated) names, those with no
/// match in `existing`. Existing authors always win over creating a
/// duplicate.
pub fn partition_missing(requested: &[String], existing: &[Author]) -> Vec<String> {
    let known: HashSet<&str> = existing.iter().map(|a| a.name.as_str()).collect();
    requested
        .iter()
        .filter(|name| !known.contains(name.as_str()))
        .cloned()
        .collect()
}

/// Normalize raw names preserving first-seen order, dropping duplicates and
/// blanks.
pub fn normalize_names(raw: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.iter()
        .map(|n| normalize(n))
        .filter(|n| !n.is_empty() && seen.insert(n.clone()))
        .collect()
}

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Seed the sentinel author. Idempotent; called once at startup. An
    /// existing non-system row with the reserved name is promoted rather
    /// than colliding with the name unique index.
    pub async fn ensure_system_author(&self) -> AppResult<Author> {
        let existing = sqlx::query_as::<_, Author>(
            "SELECT id, name, system FROM authors WHERE name = $1",
        )
        .bind(SYSTEM_AUTHOR_NAME)
        .fetch_optional(&self.pool)
        .await?;

        match existing {
            Some(author) if author.system => Ok(author),
            Some(author) => {
                sqlx::query("UPDATE authors SET system = TRUE WHERE id = $1")
                    .bind(author.id)
                    .execute(&self.pool)
                    .await?;
                Ok(Author { system: true, ..author })
            }
            None => {
                let author = sqlx::query_as::<_, Author>(
                    "INSERT INTO authors (name, system) VALUES ($1, TRUE) \
                     RETURNING id, name, system",
                )
                .bind(SYSTEM_AUTHOR_NAME)
                .fetch_one(&self.pool)
                .await?;
                tracing::info!("Seeded system author '{}' (id={})", author.name, author.id);
                Ok(author)
            }
        }
    }

    /// The sentinel author, inside the caller's transaction. `Fatal` when
    /// missing: the cascade cannot uphold the every-book-has-an-author
    /// invariant without it.
    pub async fn get_system_author_tx(
        tx: &mut Transaction<'_, Postgres>,
    ) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(
            "SELECT id, name, system FROM authors WHERE name = $1 AND system = TRUE",
        )
        .bind(SYSTEM_AUTHOR_NAME)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::Fatal("System author 'anonimo' not found".to_string()))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT id, name, system FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }

    pub async fn get_many(&self) -> AppResult<Vec<Author>> {
        let authors =
            sqlx::query_as::<_, Author>("SELECT id, name, system FROM authors ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(authors)
    }

    /// Existing authors matching the given raw names. Misses are silently
    /// omitted; the caller computes the complement.
    pub async fn find_by_names(&self, names: &[String]) -> AppResult<Vec<Author>> {
        let normalized = normalize_names(names);
        let authors = sqlx::query_as::<_, Author>(
            "SELECT id, name, system FROM authors WHERE name = ANY($1)",
        )
        .bind(&normalized)
        .fetch_all(&self.pool)
        .await?;
        Ok(authors)
    }

    pub async fn find_by_names_tx(
        tx: &mut Transaction<'_, Postgres>,
        normalized: &[String],
    ) -> AppResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(
            "SELECT id, name, system FROM authors WHERE name = ANY($1)",
        )
        .bind(normalized)
        .fetch_all(&mut **tx)
        .await?;
        Ok(authors)
    }

    /// Insert authors by normalized name. The caller must have deduplicated
    /// the input against itself and against existing rows.
    pub async fn create_many_tx(
        tx: &mut Transaction<'_, Postgres>,
        normalized: &[String],
    ) -> AppResult<Vec<i32>> {
        let mut ids = Vec::with_capacity(normalized.len());
        for name in normalized {
            let id = sqlx::query_scalar::<_, i32>(
                "INSERT INTO authors (name, system) VALUES ($1, FALSE) RETURNING id",
            )
            .bind(name)
            .fetch_one(&mut **tx)
            .await?;
            ids.push(id);
        }
        Ok(ids)
    }

    pub async fn create_many(&self, names: &[String]) -> AppResult<Vec<Author>> {
        let normalized = normalize_names(names);
        let mut tx = self.pool.begin().await?;
        let ids = Self::create_many_tx(&mut tx, &normalized).await?;
        tx.commit().await?;

        Ok(ids
            .into_iter()
            .zip(normalized)
            .map(|(id, name)| Author { id, name, system: false })
            .collect())
    }

    /// Rename an author. `Forbidden` for system authors, `Conflict` when
    /// another author already holds the normalized name.
    pub async fn rename(&self, id: i32, new_name: &str) -> AppResult<Author> {
        let author = self.get_by_id(id).await?;
        if author.system {
            return Err(AppError::Forbidden(
                "System authors cannot be renamed".to_string(),
            ));
        }

        let name = normalize(new_name);
        if name.is_empty() {
            return Err(AppError::Validation("Author name cannot be blank".to_string()));
        }

        let renamed = sqlx::query_as::<_, Author>(
            "UPDATE authors SET name = $1 WHERE id = $2 RETURNING id, name, system",
        )
        .bind(&name)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(renamed)
    }

    /// Find-or-create an author by name and link it to a book, dropping the
    /// sentinel link the book may hold. One transaction.
    pub async fn create_and_link(&self, name: &str, book_id: i32) -> AppResult<Author> {
        let normalized = normalize(name);
        if normalized.is_empty() {
            return Err(AppError::Validation("Author name cannot be blank".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let author = match sqlx::query_as::<_, Author>(
            "SELECT id, name, system FROM authors WHERE name = $1",
        )
        .bind(&normalized)
        .fetch_optional(&mut *tx)
        .await?
        {
            Some(author) => author,
            None => {
                sqlx::query_as::<_, Author>(
                    "INSERT INTO authors (name, system) VALUES ($1, FALSE) \
                     RETURNING id, name, system",
                )
                .bind(&normalized)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        // A real author replaces the sentinel stand-in.
        if !author.system {
            sqlx::query(
                "DELETE FROM authorships WHERE book_id = $1 AND author_id IN \
                 (SELECT id FROM authors WHERE system = TRUE)",
            )
            .bind(book_id)
            .execute(&mut *tx)
            .await?;
        }

        AuthorshipsRepository::create_many_tx(&mut tx, book_id, &[author.id]).await?;

        tx.commit().await?;
        Ok(author)
    }

    /// Unlink an author from a book. Atomically: delete the authorship,
    /// fall back to the sentinel when the book is left authorless, delete
    /// the author when orphaned.
    pub async fn unlink_from_book(&self, author_id: i32, book_id: i32) -> AppResult<()> {
        let author = self.get_by_id(author_id).await?;
        if author.system {
            return Err(AppError::Forbidden(
                "System authors cannot be unlinked from a book".to_string(),
            ));
        }

        let mut tx = super::begin_serializable(&self.pool).await?;

        AuthorshipsRepository::delete_tx(&mut tx, book_id, author_id).await?;

        if !AuthorshipsRepository::exists_for_book_tx(&mut tx, book_id).await? {
            let sentinel = Self::get_system_author_tx(&mut tx).await?;
            AuthorshipsRepository::create_many_tx(&mut tx, book_id, &[sentinel.id]).await?;
            tracing::debug!(
                "Book {} left authorless, linked to system author {}",
                book_id,
                sentinel.id
            );
        }

        if !AuthorshipsRepository::exists_for_author_tx(&mut tx, author_id).await? {
            sqlx::query("DELETE FROM authors WHERE id = $1 AND system = FALSE")
                .bind(author_id)
                .execute(&mut *tx)
                .await?;
            tracing::debug!("Author {} orphaned, deleted", author_id);
        }

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(id: i32, name: &str) -> Author {
        Author { id, name: name.to_string(), system: false }
    }

    #[test]
    fn normalize_names_dedupes_equivalent_raw_forms() {
        let raw = vec![
            " Isabel  Allende".to_string(),
            "ISABEL ALLENDE".to_string(),
            "garcía márquez".to_string(),
            "".to_string(),
            "   ".to_string(),
        ];
        assert_eq!(normalize_names(&raw), vec!["isabel allende", "garcía márquez"]);
    }

    #[test]
    fn partition_keeps_only_unknown_names() {
        let requested = vec![
            "isabel allende".to_string(),
            "garcía márquez".to_string(),
            "julio cortázar".to_string(),
        ];
        let existing = vec![author(1, "garcía márquez")];

        let missing = partition_missing(&requested, &existing);
        assert_eq!(missing, vec!["isabel allende", "julio cortázar"]);
    }

    #[test]
    fn partition_with_no_existing_returns_everything() {
        let requested = vec!["a".to_string(), "b".to_string()];
        assert_eq!(partition_missing(&requested, &[]), requested);
    }

    #[test]
    fn partition_with_all_existing_returns_nothing() {
        let requested = vec!["a".to_string()];
        let existing = vec![author(1, "a")];
        assert!(partition_missing(&requested, &existing).is_empty());
    }
}
