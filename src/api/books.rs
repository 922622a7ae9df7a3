//! Book endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::{AppResult, ErrorResponse},
    models::BookInput,
    services::books::{BookDelete, BookDetail, BookForm, BookList},
    views::{Page, Submission},
    AppState,
};

use super::parse_id;

/// List all books with their authors
#[utoipa::path(
    get,
    path = "/catalog/books",
    tag = "books",
    responses((status = 200, description = "Book list page"))
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Page<BookList>> {
    state.services.books.list().await
}

/// Book details with author, genres and copies
#[utoipa::path(
    get,
    path = "/catalog/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book detail page"),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Page<BookDetail>> {
    state.services.books.detail(parse_id(&id)?).await
}

/// Empty book form with every author and genre to choose from
#[utoipa::path(
    get,
    path = "/catalog/books/create",
    tag = "books",
    responses((status = 200, description = "Book form page"))
)]
pub async fn create_book_form(State(state): State<AppState>) -> AppResult<Page<BookForm>> {
    state.services.books.create_form().await
}

/// Create a book
#[utoipa::path(
    post,
    path = "/catalog/books/create",
    tag = "books",
    request_body = BookInput,
    responses(
        (status = 303, description = "Created, redirects to the book"),
        (status = 422, description = "Form page with violations")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Json(input): Json<BookInput>,
) -> AppResult<Submission<BookForm>> {
    state.services.books.create(input).await
}

/// Book form with the current author and genres selected
#[utoipa::path(
    get,
    path = "/catalog/books/{id}/update",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book form page"),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn update_book_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Page<BookForm>> {
    state.services.books.update_form(parse_id(&id)?).await
}

/// Replace a book
#[utoipa::path(
    post,
    path = "/catalog/books/{id}/update",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    request_body = BookInput,
    responses(
        (status = 303, description = "Updated, redirects to the book"),
        (status = 422, description = "Form page with violations"),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<BookInput>,
) -> AppResult<Submission<BookForm>> {
    state.services.books.update(parse_id(&id)?, input).await
}

/// Delete confirmation page listing the book's copies
#[utoipa::path(
    get,
    path = "/catalog/books/{id}/delete",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Delete confirmation page"),
        (status = 303, description = "Unknown book, redirects to the list")
    )
)]
pub async fn delete_book_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Submission<BookDelete>> {
    state.services.books.delete_form(parse_id(&id)?).await
}

/// Delete a book. Its copies are kept.
#[utoipa::path(
    post,
    path = "/catalog/books/{id}/delete",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses((status = 303, description = "Deleted, redirects to the list"))
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Submission<BookDelete>> {
    state.services.books.delete(parse_id(&id)?).await
}
