//! Entity store: the persistence contract used by the catalog services
//!
//! [`CatalogStore`] is implemented by [`Repository`] (PostgreSQL) and by
//! [`memory::MemoryStore`] (in-process). Services only ever see
//! `Arc<dyn CatalogStore>`.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod memory;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        Author, AuthorFields, Book, BookFields, BookInstance, BookInstanceFields,
        BookInstanceStatus, EntityKind, Genre, GenreFields,
    },
};

pub use memory::MemoryStore;

/// Find, filter, join, insert, replace and delete for every entity kind.
///
/// `*_replace` and `*_delete` report a missing id as `None` / `false`
/// rather than as an error. Joins are explicit: callers resolve reference
/// ids with the `*_find_many` methods.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Check that the store is reachable
    async fn ping(&self) -> AppResult<()>;

    /// Release the store's resources. Called once at shutdown.
    async fn close(&self);

    async fn count(&self, kind: EntityKind) -> AppResult<i64>;

    // Authors
    async fn author_find(&self, id: Uuid) -> AppResult<Option<Author>>;
    async fn authors_list(&self) -> AppResult<Vec<Author>>;
    async fn authors_find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Author>>;
    async fn author_insert(&self, fields: &AuthorFields) -> AppResult<Author>;
    async fn author_replace(&self, id: Uuid, fields: &AuthorFields) -> AppResult<Option<Author>>;
    async fn author_delete(&self, id: Uuid) -> AppResult<bool>;

    // Genres
    async fn genre_find(&self, id: Uuid) -> AppResult<Option<Genre>>;
    /// All genres, sorted by name ascending
    async fn genres_list(&self) -> AppResult<Vec<Genre>>;
    /// Case-insensitive lookup by name
    async fn genre_find_by_name(&self, name: &str) -> AppResult<Option<Genre>>;
    async fn genres_find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Genre>>;
    async fn genre_insert(&self, fields: &GenreFields) -> AppResult<Genre>;
    async fn genre_replace(&self, id: Uuid, fields: &GenreFields) -> AppResult<Option<Genre>>;
    async fn genre_delete(&self, id: Uuid) -> AppResult<bool>;

    // Books
    async fn book_find(&self, id: Uuid) -> AppResult<Option<Book>>;
    async fn books_list(&self) -> AppResult<Vec<Book>>;
    /// All books, sorted by title ascending
    async fn books_list_by_title(&self) -> AppResult<Vec<Book>>;
    async fn books_by_author(&self, author: Uuid) -> AppResult<Vec<Book>>;
    async fn books_by_genre(&self, genre: Uuid) -> AppResult<Vec<Book>>;
    async fn books_find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Book>>;
    async fn book_insert(&self, fields: &BookFields) -> AppResult<Book>;
    async fn book_replace(&self, id: Uuid, fields: &BookFields) -> AppResult<Option<Book>>;
    async fn book_delete(&self, id: Uuid) -> AppResult<bool>;

    // Book instances
    async fn instance_find(&self, id: Uuid) -> AppResult<Option<BookInstance>>;
    async fn instances_list(&self) -> AppResult<Vec<BookInstance>>;
    async fn instances_by_book(&self, book: Uuid) -> AppResult<Vec<BookInstance>>;
    async fn instances_count_with_status(&self, status: BookInstanceStatus) -> AppResult<i64>;
    async fn instance_insert(&self, fields: &BookInstanceFields) -> AppResult<BookInstance>;
    async fn instance_replace(
        &self,
        id: Uuid,
        fields: &BookInstanceFields,
    ) -> AppResult<Option<BookInstance>>;
    async fn instance_delete(&self, id: Uuid) -> AppResult<bool>;
}

/// PostgreSQL-backed store holding the process-wide connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for Repository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    async fn count(&self, kind: EntityKind) -> AppResult<i64> {
        let table = match kind {
            EntityKind::Author => "authors",
            EntityKind::Genre => "genres",
            EntityKind::Book => "books",
            EntityKind::BookInstance => "book_instances",
        };
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        let count: i64 = sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn author_find(&self, id: Uuid) -> AppResult<Option<Author>> {
        self.authors_get_by_id(id).await
    }

    async fn authors_list(&self) -> AppResult<Vec<Author>> {
        self.authors_list_all().await
    }

    async fn authors_find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Author>> {
        self.authors_get_many(ids).await
    }

    async fn author_insert(&self, fields: &AuthorFields) -> AppResult<Author> {
        self.authors_create(fields).await
    }

    async fn author_replace(&self, id: Uuid, fields: &AuthorFields) -> AppResult<Option<Author>> {
        self.authors_replace(id, fields).await
    }

    async fn author_delete(&self, id: Uuid) -> AppResult<bool> {
        self.authors_delete(id).await
    }

    async fn genre_find(&self, id: Uuid) -> AppResult<Option<Genre>> {
        self.genres_get_by_id(id).await
    }

    async fn genres_list(&self) -> AppResult<Vec<Genre>> {
        self.genres_list_by_name().await
    }

    async fn genre_find_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        self.genres_get_by_name(name).await
    }

    async fn genres_find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Genre>> {
        self.genres_get_many(ids).await
    }

    async fn genre_insert(&self, fields: &GenreFields) -> AppResult<Genre> {
        self.genres_create(fields).await
    }

    async fn genre_replace(&self, id: Uuid, fields: &GenreFields) -> AppResult<Option<Genre>> {
        self.genres_replace(id, fields).await
    }

    async fn genre_delete(&self, id: Uuid) -> AppResult<bool> {
        self.genres_delete(id).await
    }

    async fn book_find(&self, id: Uuid) -> AppResult<Option<Book>> {
        self.books_get_by_id(id).await
    }

    async fn books_list(&self) -> AppResult<Vec<Book>> {
        self.books_list_all().await
    }

    async fn books_list_by_title(&self) -> AppResult<Vec<Book>> {
        self.books_list_sorted_by_title().await
    }

    async fn books_by_author(&self, author: Uuid) -> AppResult<Vec<Book>> {
        self.books_get_by_author(author).await
    }

    async fn books_by_genre(&self, genre: Uuid) -> AppResult<Vec<Book>> {
        self.books_get_by_genre(genre).await
    }

    async fn books_find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Book>> {
        self.books_get_many(ids).await
    }

    async fn book_insert(&self, fields: &BookFields) -> AppResult<Book> {
        self.books_create(fields).await
    }

    async fn book_replace(&self, id: Uuid, fields: &BookFields) -> AppResult<Option<Book>> {
        self.books_replace(id, fields).await
    }

    async fn book_delete(&self, id: Uuid) -> AppResult<bool> {
        self.books_delete(id).await
    }

    async fn instance_find(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        self.book_instances_get_by_id(id).await
    }

    async fn instances_list(&self) -> AppResult<Vec<BookInstance>> {
        self.book_instances_list_all().await
    }

    async fn instances_by_book(&self, book: Uuid) -> AppResult<Vec<BookInstance>> {
        self.book_instances_get_by_book(book).await
    }

    async fn instances_count_with_status(&self, status: BookInstanceStatus) -> AppResult<i64> {
        self.book_instances_count_with_status(status).await
    }

    async fn instance_insert(&self, fields: &BookInstanceFields) -> AppResult<BookInstance> {
        self.book_instances_create(fields).await
    }

    async fn instance_replace(
        &self,
        id: Uuid,
        fields: &BookInstanceFields,
    ) -> AppResult<Option<BookInstance>> {
        self.book_instances_replace(id, fields).await
    }

    async fn instance_delete(&self, id: Uuid) -> AppResult<bool> {
        self.book_instances_delete(id).await
    }
}
