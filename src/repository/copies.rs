//! Copies repository for database operations.
//!
//! Copy numbers are sequential per edition: new copies continue after the
//! highest number among the surviving rows.

use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::copy::{Copy, RemovalCheck},
};

#[derive(Clone)]
pub struct CopiesRepository {
    pool: Pool<Postgres>,
}

impl CopiesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert `count` copies numbered sequentially from `start_number`
    /// inside the caller's transaction.
    pub async fn insert_numbered_tx(
        tx: &mut Transaction<'_, Postgres>,
        edition_id: i32,
        start_number: i32,
        count: i32,
    ) -> AppResult<Vec<i32>> {
        let mut ids = Vec::with_capacity(count.max(0) as usize);
        for offset in 0..count {
            let id = sqlx::query_scalar::<_, i32>(
                "INSERT INTO copies (edition_id, copy_number) VALUES ($1, $2) RETURNING id",
            )
            .bind(edition_id)
            .bind(start_number + offset)
            .fetch_one(&mut **tx)
            .await?;
            ids.push(id);
        }
        Ok(ids)
    }

    /// Add `count` copies to an edition, numbered after the current maximum.
    pub async fn add_to_edition(&self, edition_id: i32, count: i32) -> AppResult<Vec<Copy>> {
        let mut tx = self.pool.begin().await?;

        let next_number: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(copy_number), 0) + 1 FROM copies WHERE edition_id = $1",
        )
        .bind(edition_id)
        .fetch_one(&mut *tx)
        .await?;

        let ids = Self::insert_numbered_tx(&mut tx, edition_id, next_number, count).await?;

        tx.commit().await?;

        Ok(ids
            .into_iter()
            .enumerate()
            .map(|(i, id)| Copy {
                id,
                edition_id,
                copy_number: next_number + i as i32,
            })
            .collect())
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Copy> {
        sqlx::query_as::<_, Copy>(
            "SELECT id, edition_id, copy_number FROM copies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Copy with id {} not found", id)))
    }

    pub async fn get_for_edition(&self, edition_id: i32) -> AppResult<Vec<Copy>> {
        let copies = sqlx::query_as::<_, Copy>(
            "SELECT id, edition_id, copy_number FROM copies \
             WHERE edition_id = $1 ORDER BY copy_number",
        )
        .bind(edition_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(copies)
    }

    /// Removal guards: a copy with an active loan or the last copy of its
    /// edition cannot be removed.
    pub async fn can_remove(&self, copy_id: i32) -> AppResult<RemovalCheck> {
        let copy = self.get_by_id(copy_id).await?;

        let active_loan: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM loans WHERE copy_id = $1 AND return_date IS NULL)",
        )
        .bind(copy_id)
        .fetch_one(&self.pool)
        .await?;

        if active_loan {
            return Ok(RemovalCheck::refused("active loan"));
        }

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM copies WHERE edition_id = $1")
            .bind(copy.edition_id)
            .fetch_one(&self.pool)
            .await?;

        if total <= 1 {
            return Ok(RemovalCheck::refused("last copy of edition"));
        }

        Ok(RemovalCheck::allowed())
    }

    /// Delete a copy and its returned loans. Precondition: the caller has
    /// checked [`can_remove`](Self::can_remove); this does not re-check.
    pub async fn remove(&self, copy_id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM loans WHERE copy_id = $1 AND return_date IS NOT NULL")
            .bind(copy_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM copies WHERE id = $1")
            .bind(copy_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
