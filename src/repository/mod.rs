//! Repository layer for database operations

pub mod authors;
pub mod authorships;
pub mod books;
pub mod copies;
pub mod editions;
pub mod loans;
pub mod patrons;

use sqlx::{Pool, Postgres, Transaction};

use crate::error::AppResult;

/// Open a SERIALIZABLE transaction for the multi-step cascade
/// orchestrations. Two concurrent cascades touching a shared author must
/// not both read the pre-delete state of the relation table and skip the
/// orphan sweep; under SERIALIZABLE the losing transaction aborts with a
/// serialization failure, which surfaces as `Transient` and is retryable
/// whole.
pub(crate) async fn begin_serializable(
    pool: &Pool<Postgres>,
) -> AppResult<Transaction<'_, Postgres>> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub authors: authors::AuthorsRepository,
    pub authorships: authorships::AuthorshipsRepository,
    pub editions: editions::EditionsRepository,
    pub copies: copies::CopiesRepository,
    pub loans: loans::LoansRepository,
    pub patrons: patrons::PatronsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            authors: authors::AuthorsRepository::new(pool.clone()),
            authorships: authorships::AuthorshipsRepository::new(pool.clone()),
            editions: editions::EditionsRepository::new(pool.clone()),
            copies: copies::CopiesRepository::new(pool.clone()),
            loans: loans::LoansRepository::new(pool.clone()),
            patrons: patrons::PatronsRepository::new(pool.clone()),
            pool,
        }
    }
}
