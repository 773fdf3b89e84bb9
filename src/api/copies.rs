//! Copy endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::copy::{AddCopies, Copy, RemovalCheck},
};

/// List copies of an edition
#[utoipa::path(
    get,
    path = "/copies/edition/{edition_id}",
    tag = "copies",
    params(("edition_id" = i32, Path, description = "Edition ID")),
    responses(
        (status = 200, description = "Copies of the edition", body = [Copy]),
        (status = 404, description = "Edition not found")
    )
)]
pub async fn list_edition_copies(
    State(state): State<crate::AppState>,
    Path(edition_id): Path<i32>,
) -> AppResult<Json<Vec<Copy>>> {
    let copies = state.services.catalog.get_edition_copies(edition_id).await?;
    Ok(Json(copies))
}

/// Get copy by ID
#[utoipa::path(
    get,
    path = "/copies/{id}",
    tag = "copies",
    params(("id" = i32, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Copy", body = Copy),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn get_copy(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Copy>> {
    let copy = state.services.catalog.get_copy(id).await?;
    Ok(Json(copy))
}

/// Add copies to an edition, numbered after the current maximum
#[utoipa::path(
    post,
    path = "/copies/edition/{edition_id}",
    tag = "copies",
    params(("edition_id" = i32, Path, description = "Edition ID")),
    request_body = AddCopies,
    responses(
        (status = 201, description = "Copies added", body = [Copy]),
        (status = 404, description = "Edition not found")
    )
)]
pub async fn add_copies(
    State(state): State<crate::AppState>,
    Path(edition_id): Path<i32>,
    Json(input): Json<AddCopies>,
) -> AppResult<(StatusCode, Json<Vec<Copy>>)> {
    let copies = state.services.catalog.add_copies(edition_id, input).await?;
    Ok((StatusCode::CREATED, Json(copies)))
}

/// Check whether a copy can be removed
#[utoipa::path(
    get,
    path = "/copies/{id}/can-remove",
    tag = "copies",
    params(("id" = i32, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Removal check", body = RemovalCheck),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn can_remove_copy(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<RemovalCheck>> {
    let check = state.services.catalog.can_remove_copy(id).await?;
    Ok(Json(check))
}

/// Remove a copy (guarded: refused for active loans or the last copy of an
/// edition)
#[utoipa::path(
    delete,
    path = "/copies/{id}",
    tag = "copies",
    params(("id" = i32, Path, description = "Copy ID")),
    responses(
        (status = 204, description = "Copy removed"),
        (status = 404, description = "Copy not found"),
        (status = 412, description = "Active loan or last copy of edition")
    )
)]
pub async fn remove_copy(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.catalog.remove_copy(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
