//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, book_instances, books, catalog, genres, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Local Library Catalog API",
        version = "0.1.0",
        description = "Catalog of authors, genres, books and their physical copies",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Catalog
        catalog::index,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author_form,
        authors::create_author,
        authors::update_author_form,
        authors::update_author,
        authors::delete_author_form,
        authors::delete_author,
        // Genres
        genres::list_genres,
        genres::get_genre,
        genres::create_genre_form,
        genres::create_genre,
        genres::update_genre_form,
        genres::update_genre,
        genres::delete_genre_form,
        genres::delete_genre,
        // Books
        books::list_books,
        books::get_book,
        books::create_book_form,
        books::create_book,
        books::update_book_form,
        books::update_book,
        books::delete_book_form,
        books::delete_book,
        // Book instances
        book_instances::list_book_instances,
        book_instances::get_book_instance,
        book_instances::create_book_instance_form,
        book_instances::create_book_instance,
        book_instances::update_book_instance_form,
        book_instances::update_book_instance,
        book_instances::delete_book_instance_form,
        book_instances::delete_book_instance,
    ),
    components(
        schemas(
            // Entities
            crate::models::Author,
            crate::models::Genre,
            crate::models::Book,
            crate::models::BookInstance,
            crate::models::BookInstanceStatus,
            crate::models::EntityKind,
            // Forms
            crate::models::AuthorInput,
            crate::models::GenreInput,
            crate::models::BookInput,
            crate::models::BookInstanceInput,
            crate::validation::Violation,
            // Pages
            crate::services::catalog::CatalogCounts,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Catalog home"),
        (name = "authors", description = "Author management"),
        (name = "genres", description = "Genre management"),
        (name = "books", description = "Book management"),
        (name = "bookinstances", description = "Physical copy management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
