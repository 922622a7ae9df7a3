//! HTTP routing for the catalog
//!
//! Pages are returned as JSON (`view`, `title` and the view's data) for the
//! presentation layer to render. Successful form submissions answer with a
//! `303 See Other` to the entity's canonical url.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;
pub mod health;
pub mod openapi;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    views::{Page, Submission},
    AppState,
};

impl<T: Serialize> IntoResponse for Page<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

impl<T: Serialize> IntoResponse for Submission<T> {
    fn into_response(self) -> Response {
        match self {
            Submission::Render(page) => page.into_response(),
            Submission::Rejected(page) => (StatusCode::UNPROCESSABLE_ENTITY, Json(page)).into_response(),
            Submission::Redirect(url) => Redirect::to(&url).into_response(),
        }
    }
}

/// Parse an id from the path. Malformed ids cannot name an entity.
pub fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("No entity with id {}", raw)))
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let catalog = Router::new()
        .route("/", get(catalog::index))
        // Authors
        .route("/authors", get(authors::list_authors))
        .route(
            "/authors/create",
            get(authors::create_author_form).post(authors::create_author),
        )
        .route("/authors/:id", get(authors::get_author))
        .route(
            "/authors/:id/update",
            get(authors::update_author_form).post(authors::update_author),
        )
        .route(
            "/authors/:id/delete",
            get(authors::delete_author_form).post(authors::delete_author),
        )
        // Genres
        .route("/genres", get(genres::list_genres))
        .route(
            "/genres/create",
            get(genres::create_genre_form).post(genres::create_genre),
        )
        .route("/genres/:id", get(genres::get_genre))
        .route(
            "/genres/:id/update",
            get(genres::update_genre_form).post(genres::update_genre),
        )
        .route(
            "/genres/:id/delete",
            get(genres::delete_genre_form).post(genres::delete_genre),
        )
        // Books
        .route("/books", get(books::list_books))
        .route("/books/create", get(books::create_book_form).post(books::create_book))
        .route("/books/:id", get(books::get_book))
        .route(
            "/books/:id/update",
            get(books::update_book_form).post(books::update_book),
        )
        .route(
            "/books/:id/delete",
            get(books::delete_book_form).post(books::delete_book),
        )
        // Book instances
        .route("/bookinstances", get(book_instances::list_book_instances))
        .route(
            "/bookinstances/create",
            get(book_instances::create_book_instance_form).post(book_instances::create_book_instance),
        )
        .route("/bookinstances/:id", get(book_instances::get_book_instance))
        .route(
            "/bookinstances/:id/update",
            get(book_instances::update_book_instance_form)
                .post(book_instances::update_book_instance),
        )
        .route(
            "/bookinstances/:id/delete",
            get(book_instances::delete_book_instance_form)
                .post(book_instances::delete_book_instance),
        );

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/catalog", catalog)
        .with_state(state)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
