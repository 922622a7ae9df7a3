//! Book instance (copy) endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::{AppResult, ErrorResponse},
    models::BookInstanceInput,
    services::book_instances::{BookInstanceDetail, BookInstanceForm, BookInstanceList},
    views::{Page, Submission},
    AppState,
};

use super::parse_id;

/// List all copies with their books
#[utoipa::path(
    get,
    path = "/catalog/bookinstances",
    tag = "bookinstances",
    responses((status = 200, description = "Copy list page"))
)]
pub async fn list_book_instances(State(state): State<AppState>) -> AppResult<Page<BookInstanceList>> {
    state.services.book_instances.list().await
}

#[utoipa::path(
    get,
    path = "/catalog/bookinstances/{id}",
    tag = "bookinstances",
    params(("id" = String, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Copy detail page"),
        (status = 404, description = "Copy not found", body = ErrorResponse)
    )
)]
pub async fn get_book_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Page<BookInstanceDetail>> {
    state.services.book_instances.detail(parse_id(&id)?).await
}

/// Empty copy form with books sorted by title
#[utoipa::path(
    get,
    path = "/catalog/bookinstances/create",
    tag = "bookinstances",
    responses((status = 200, description = "Copy form page"))
)]
pub async fn create_book_instance_form(
    State(state): State<AppState>,
) -> AppResult<Page<BookInstanceForm>> {
    state.services.book_instances.create_form().await
}

#[utoipa::path(
    post,
    path = "/catalog/bookinstances/create",
    tag = "bookinstances",
    request_body = BookInstanceInput,
    responses(
        (status = 303, description = "Created, redirects to the copy"),
        (status = 422, description = "Form page with violations")
    )
)]
pub async fn create_book_instance(
    State(state): State<AppState>,
    Json(input): Json<BookInstanceInput>,
) -> AppResult<Submission<BookInstanceForm>> {
    state.services.book_instances.create(input).await
}

#[utoipa::path(
    get,
    path = "/catalog/bookinstances/{id}/update",
    tag = "bookinstances",
    params(("id" = String, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Copy form page"),
        (status = 404, description = "Copy not found", body = ErrorResponse)
    )
)]
pub async fn update_book_instance_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Page<BookInstanceForm>> {
    state.services.book_instances.update_form(parse_id(&id)?).await
}

#[utoipa::path(
    post,
    path = "/catalog/bookinstances/{id}/update",
    tag = "bookinstances",
    params(("id" = String, Path, description = "Book instance ID")),
    request_body = BookInstanceInput,
    responses(
        (status = 303, description = "Updated, redirects to the copy"),
        (status = 422, description = "Form page with violations"),
        (status = 404, description = "Copy not found", body = ErrorResponse)
    )
)]
pub async fn update_book_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<BookInstanceInput>,
) -> AppResult<Submission<BookInstanceForm>> {
    state.services.book_instances.update(parse_id(&id)?, input).await
}

#[utoipa::path(
    get,
    path = "/catalog/bookinstances/{id}/delete",
    tag = "bookinstances",
    params(("id" = String, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Delete confirmation page"),
        (status = 303, description = "Unknown copy, redirects to the list")
    )
)]
pub async fn delete_book_instance_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Submission<BookInstanceDetail>> {
    state.services.book_instances.delete_form(parse_id(&id)?).await
}

#[utoipa::path(
    post,
    path = "/catalog/bookinstances/{id}/delete",
    tag = "bookinstances",
    params(("id" = String, Path, description = "Book instance ID")),
    responses((status = 303, description = "Deleted, redirects to the list"))
)]
pub async fn delete_book_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Submission<BookInstanceDetail>> {
    state.services.book_instances.delete(parse_id(&id)?).await
}
