//! Author endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::{AppResult, ErrorResponse},
    models::AuthorInput,
    services::authors::{AuthorDelete, AuthorDetail, AuthorForm, AuthorList},
    views::{Page, Submission},
    AppState,
};

use super::parse_id;

/// List all authors
#[utoipa::path(
    get,
    path = "/catalog/authors",
    tag = "authors",
    responses((status = 200, description = "Author list page"))
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Page<AuthorList>> {
    state.services.authors.list().await
}

/// Author details with their books
#[utoipa::path(
    get,
    path = "/catalog/authors/{id}",
    tag = "authors",
    params(("id" = String, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author detail page"),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Page<AuthorDetail>> {
    state.services.authors.detail(parse_id(&id)?).await
}

/// Empty author form
#[utoipa::path(
    get,
    path = "/catalog/authors/create",
    tag = "authors",
    responses((status = 200, description = "Author form page"))
)]
pub async fn create_author_form(State(state): State<AppState>) -> Page<AuthorForm> {
    state.services.authors.create_form()
}

/// Create an author
#[utoipa::path(
    post,
    path = "/catalog/authors/create",
    tag = "authors",
    request_body = AuthorInput,
    responses(
        (status = 303, description = "Created, redirects to the author"),
        (status = 422, description = "Form page with violations")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    Json(input): Json<AuthorInput>,
) -> AppResult<Submission<AuthorForm>> {
    state.services.authors.create(input).await
}

/// Author form pre-filled with the stored author
#[utoipa::path(
    get,
    path = "/catalog/authors/{id}/update",
    tag = "authors",
    params(("id" = String, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author form page"),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn update_author_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Page<AuthorForm>> {
    state.services.authors.update_form(parse_id(&id)?).await
}

/// Replace an author
#[utoipa::path(
    post,
    path = "/catalog/authors/{id}/update",
    tag = "authors",
    params(("id" = String, Path, description = "Author ID")),
    request_body = AuthorInput,
    responses(
        (status = 303, description = "Updated, redirects to the author"),
        (status = 422, description = "Form page with violations"),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<AuthorInput>,
) -> AppResult<Submission<AuthorForm>> {
    state.services.authors.update(parse_id(&id)?, input).await
}

/// Delete confirmation page listing the author's books
#[utoipa::path(
    get,
    path = "/catalog/authors/{id}/delete",
    tag = "authors",
    params(("id" = String, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Delete confirmation page"),
        (status = 303, description = "Unknown author, redirects to the list")
    )
)]
pub async fn delete_author_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Submission<AuthorDelete>> {
    state.services.authors.delete_form(parse_id(&id)?).await
}

/// Delete an author that has no books
#[utoipa::path(
    post,
    path = "/catalog/authors/{id}/delete",
    tag = "authors",
    params(("id" = String, Path, description = "Author ID")),
    responses(
        (status = 303, description = "Deleted, redirects to the list"),
        (status = 422, description = "Author still has books")
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Submission<AuthorDelete>> {
    state.services.authors.delete(parse_id(&id)?).await
}
