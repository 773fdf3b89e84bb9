//! Edition endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::edition::{CreateEdition, Edition, EditionWithCopies, UpdateEdition},
};

/// List editions of a book
#[utoipa::path(
    get,
    path = "/editions/book/{book_id}",
    tag = "editions",
    params(("book_id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Editions of the book", body = [Edition]),
        (status = 404, description = "Book not found")
    )
)]
pub async fn list_book_editions(
    State(state): State<crate::AppState>,
    Path(book_id): Path<i32>,
) -> AppResult<Json<Vec<Edition>>> {
    let editions = state.services.catalog.get_book_editions(book_id).await?;
    Ok(Json(editions))
}

/// Get edition by ID
#[utoipa::path(
    get,
    path = "/editions/{id}",
    tag = "editions",
    params(("id" = i32, Path, description = "Edition ID")),
    responses(
        (status = 200, description = "Edition", body = Edition),
        (status = 404, description = "Edition not found")
    )
)]
pub async fn get_edition(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Edition>> {
    let edition = state.services.catalog.get_edition(id).await?;
    Ok(Json(edition))
}

/// Create an edition for a book, with its initial numbered copies
#[utoipa::path(
    post,
    path = "/editions/book/{book_id}",
    tag = "editions",
    params(("book_id" = i32, Path, description = "Book ID")),
    request_body = CreateEdition,
    responses(
        (status = 201, description = "Edition created", body = EditionWithCopies),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Duplicate ISBN")
    )
)]
pub async fn create_edition(
    State(state): State<crate::AppState>,
    Path(book_id): Path<i32>,
    Json(input): Json<CreateEdition>,
) -> AppResult<(StatusCode, Json<EditionWithCopies>)> {
    let edition = state.services.catalog.create_edition(book_id, input).await?;
    Ok((StatusCode::CREATED, Json(edition)))
}

/// Partially update an edition
#[utoipa::path(
    patch,
    path = "/editions/{id}",
    tag = "editions",
    params(("id" = i32, Path, description = "Edition ID")),
    request_body = UpdateEdition,
    responses(
        (status = 200, description = "Edition updated", body = Edition),
        (status = 404, description = "Edition not found"),
        (status = 409, description = "Duplicate ISBN")
    )
)]
pub async fn update_edition(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateEdition>,
) -> AppResult<Json<Edition>> {
    let edition = state.services.catalog.update_edition(id, input).await?;
    Ok(Json(edition))
}

/// Delete an edition and its copies/loans; the last edition of a book is
/// refused
#[utoipa::path(
    delete,
    path = "/editions/{id}",
    tag = "editions",
    params(("id" = i32, Path, description = "Edition ID")),
    responses(
        (status = 204, description = "Edition deleted"),
        (status = 404, description = "Edition not found"),
        (status = 412, description = "Last edition of the book")
    )
)]
pub async fn delete_edition(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_edition(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
