//! Genre endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::{AppResult, ErrorResponse},
    models::GenreInput,
    services::genres::{GenreDelete, GenreDetail, GenreForm, GenreList},
    views::{Page, Submission},
    AppState,
};

use super::parse_id;

/// List all genres, sorted by name
#[utoipa::path(
    get,
    path = "/catalog/genres",
    tag = "genres",
    responses((status = 200, description = "Genre list page"))
)]
pub async fn list_genres(State(state): State<AppState>) -> AppResult<Page<GenreList>> {
    state.services.genres.list().await
}

/// Genre details with its books
#[utoipa::path(
    get,
    path = "/catalog/genres/{id}",
    tag = "genres",
    params(("id" = String, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre detail page"),
        (status = 404, description = "Genre not found", body = ErrorResponse)
    )
)]
pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Page<GenreDetail>> {
    state.services.genres.detail(parse_id(&id)?).await
}

/// Empty genre form
#[utoipa::path(
    get,
    path = "/catalog/genres/create",
    tag = "genres",
    responses((status = 200, description = "Genre form page"))
)]
pub async fn create_genre_form(State(state): State<AppState>) -> Page<GenreForm> {
    state.services.genres.create_form()
}

/// Create a genre, or find the existing one with the same name
#[utoipa::path(
    post,
    path = "/catalog/genres/create",
    tag = "genres",
    request_body = GenreInput,
    responses(
        (status = 303, description = "Created, redirects to the genre"),
        (status = 422, description = "Form page with violations")
    )
)]
pub async fn create_genre(
    State(state): State<AppState>,
    Json(input): Json<GenreInput>,
) -> AppResult<Submission<GenreForm>> {
    state.services.genres.create(input).await
}

/// Genre form pre-filled with the stored genre
#[utoipa::path(
    get,
    path = "/catalog/genres/{id}/update",
    tag = "genres",
    params(("id" = String, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre form page"),
        (status = 404, description = "Genre not found", body = ErrorResponse)
    )
)]
pub async fn update_genre_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Page<GenreForm>> {
    state.services.genres.update_form(parse_id(&id)?).await
}

/// Rename a genre
#[utoipa::path(
    post,
    path = "/catalog/genres/{id}/update",
    tag = "genres",
    params(("id" = String, Path, description = "Genre ID")),
    request_body = GenreInput,
    responses(
        (status = 303, description = "Updated, redirects to the genre"),
        (status = 422, description = "Form page with violations"),
        (status = 404, description = "Genre not found", body = ErrorResponse)
    )
)]
pub async fn update_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<GenreInput>,
) -> AppResult<Submission<GenreForm>> {
    state.services.genres.update(parse_id(&id)?, input).await
}

/// Delete confirmation page listing the genre's books
#[utoipa::path(
    get,
    path = "/catalog/genres/{id}/delete",
    tag = "genres",
    params(("id" = String, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Delete confirmation page"),
        (status = 303, description = "Unknown genre, redirects to the list")
    )
)]
pub async fn delete_genre_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Submission<GenreDelete>> {
    state.services.genres.delete_form(parse_id(&id)?).await
}

/// Delete a genre that no book uses
#[utoipa::path(
    post,
    path = "/catalog/genres/{id}/delete",
    tag = "genres",
    params(("id" = String, Path, description = "Genre ID")),
    responses(
        (status = 303, description = "Deleted, redirects to the list"),
        (status = 422, description = "Genre still has books")
    )
)]
pub async fn delete_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Submission<GenreDelete>> {
    state.services.genres.delete(parse_id(&id)?).await
}
