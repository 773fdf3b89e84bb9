//! Author endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::author::{Author, CreateAuthor, RenameAuthor},
};

/// List all authors
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    responses(
        (status = 200, description = "List of authors", body = [Author])
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Author>>> {
    let authors = state.services.authors.get_authors().await?;
    Ok(Json(authors))
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author", body = Author),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Author>> {
    let author = state.services.authors.get_author(id).await?;
    Ok(Json(author))
}

/// Find-or-create an author and link it to a book
#[utoipa::path(
    post,
    path = "/authors/book/{book_id}",
    tag = "authors",
    params(("book_id" = i32, Path, description = "Book ID")),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author linked", body = Author),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Author already linked to this book")
    )
)]
pub async fn create_author_for_book(
    State(state): State<crate::AppState>,
    Path(book_id): Path<i32>,
    Json(input): Json<CreateAuthor>,
) -> AppResult<(StatusCode, Json<Author>)> {
    let author = state.services.authors.create_and_link(&input.name, book_id).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Rename an author
#[utoipa::path(
    patch,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    request_body = RenameAuthor,
    responses(
        (status = 200, description = "Author renamed", body = Author),
        (status = 403, description = "System author"),
        (status = 404, description = "Author not found"),
        (status = 409, description = "Name already taken")
    )
)]
pub async fn rename_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(input): Json<RenameAuthor>,
) -> AppResult<Json<Author>> {
    let author = state.services.authors.rename(id, &input.name).await?;
    Ok(Json(author))
}

/// Unlink an author from a book (sentinel fallback and orphan cleanup
/// included)
#[utoipa::path(
    delete,
    path = "/authors/{id}/book/{book_id}",
    tag = "authors",
    params(
        ("id" = i32, Path, description = "Author ID"),
        ("book_id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Author unlinked"),
        (status = 403, description = "System author"),
        (status = 404, description = "Authorship not found")
    )
)]
pub async fn unlink_author_from_book(
    State(state): State<crate::AppState>,
    Path((id, book_id)): Path<(i32, i32)>,
) -> AppResult<StatusCode> {
    state.services.authors.unlink_from_book(id, book_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
