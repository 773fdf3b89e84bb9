//! Patrons repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::patron::{CreatePatron, Patron, UpdatePatron},
};

#[derive(Clone)]
pub struct PatronsRepository {
    pool: Pool<Postgres>,
}

impl PatronsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Patron> {
        sqlx::query_as::<_, Patron>("SELECT id, name, email FROM patrons WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Patron with id {} not found", id)))
    }

    pub async fn get_many(&self) -> AppResult<Vec<Patron>> {
        let patrons =
            sqlx::query_as::<_, Patron>("SELECT id, name, email FROM patrons ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(patrons)
    }

    pub async fn create(&self, input: &CreatePatron) -> AppResult<Patron> {
        let patron = sqlx::query_as::<_, Patron>(
            "INSERT INTO patrons (name, email) VALUES ($1, $2) RETURNING id, name, email",
        )
        .bind(&input.name)
        .bind(&input.email)
        .fetch_one(&self.pool)
        .await?;
        Ok(patron)
    }

    pub async fn update(&self, id: i32, input: &UpdatePatron) -> AppResult<Patron> {
        let patron = sqlx::query_as::<_, Patron>(
            r#"
            UPDATE patrons SET
                name = COALESCE($1, name),
                email = COALESCE($2, email)
            WHERE id = $3
            RETURNING id, name, email
            "#,
        )
        .bind(input.name.as_deref())
        .bind(input.email.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Patron with id {} not found", id)))?;
        Ok(patron)
    }

    /// Delete a patron. Refused while the patron holds active loans.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE patron_id = $1 AND return_date IS NULL",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if active > 0 {
            return Err(AppError::Precondition(
                "Patron has active loans".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM patrons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Patron with id {} not found", id)));
        }
        Ok(())
    }
}
