//! Patron endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::patron::{CreatePatron, Patron, UpdatePatron},
};

/// List all patrons
#[utoipa::path(
    get,
    path = "/patrons",
    tag = "patrons",
    responses(
        (status = 200, description = "List of patrons", body = [Patron])
    )
)]
pub async fn list_patrons(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Patron>>> {
    let patrons = state.services.loans.get_patrons().await?;
    Ok(Json(patrons))
}

/// Get patron by ID
#[utoipa::path(
    get,
    path = "/patrons/{id}",
    tag = "patrons",
    params(("id" = i32, Path, description = "Patron ID")),
    responses(
        (status = 200, description = "Patron", body = Patron),
        (status = 404, description = "Patron not found")
    )
)]
pub async fn get_patron(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Patron>> {
    let patron = state.services.loans.get_patron(id).await?;
    Ok(Json(patron))
}

/// Create a patron
#[utoipa::path(
    post,
    path = "/patrons",
    tag = "patrons",
    request_body = CreatePatron,
    responses(
        (status = 201, description = "Patron created", body = Patron)
    )
)]
pub async fn create_patron(
    State(state): State<crate::AppState>,
    Json(input): Json<CreatePatron>,
) -> AppResult<(StatusCode, Json<Patron>)> {
    let patron = state.services.loans.create_patron(input).await?;
    Ok((StatusCode::CREATED, Json(patron)))
}

/// Partially update a patron
#[utoipa::path(
    patch,
    path = "/patrons/{id}",
    tag = "patrons",
    params(("id" = i32, Path, description = "Patron ID")),
    request_body = UpdatePatron,
    responses(
        (status = 200, description = "Patron updated", body = Patron),
        (status = 404, description = "Patron not found")
    )
)]
pub async fn update_patron(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdatePatron>,
) -> AppResult<Json<Patron>> {
    let patron = state.services.loans.update_patron(id, input).await?;
    Ok(Json(patron))
}

/// Delete a patron (refused while the patron holds active loans)
#[utoipa::path(
    delete,
    path = "/patrons/{id}",
    tag = "patrons",
    params(("id" = i32, Path, description = "Patron ID")),
    responses(
        (status = 204, description = "Patron deleted"),
        (status = 404, description = "Patron not found"),
        (status = 412, description = "Patron has active loans")
    )
)]
pub async fn delete_patron(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.loans.delete_patron(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
