//! Referential integrity guard
//!
//! Authors and genres may only be deleted once no book references them, and
//! genre names are unique ignoring case. Both rules live here, not in the
//! store. The dependents check and the delete are two separate store calls:
//! a book created in between can still end up referencing a deleted entity.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Book, EntityKind, Genre, GenreFields},
    repository::CatalogStore,
};

use super::not_found;

/// An entity that books can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Referenced {
    Author(Uuid),
    Genre(Uuid),
}

impl Referenced {
    pub fn kind(self) -> EntityKind {
        match self {
            Referenced::Author(_) => EntityKind::Author,
            Referenced::Genre(_) => EntityKind::Genre,
        }
    }

    pub fn id(self) -> Uuid {
        match self {
            Referenced::Author(id) | Referenced::Genre(id) => id,
        }
    }
}

/// Outcome of a genre creation request
#[derive(Debug, Clone, PartialEq)]
pub enum GenreResolution {
    /// A genre with the same name (ignoring case) already existed
    Existing(Genre),
    Created(Genre),
}

impl GenreResolution {
    pub fn genre(&self) -> &Genre {
        match self {
            GenreResolution::Existing(genre) | GenreResolution::Created(genre) => genre,
        }
    }
}

#[derive(Clone)]
pub struct IntegrityGuard {
    store: Arc<dyn CatalogStore>,
}

impl IntegrityGuard {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Books referencing the given author or genre
    pub async fn dependents_of(&self, target: Referenced) -> AppResult<Vec<Book>> {
        match target {
            Referenced::Author(id) => self.store.books_by_author(id).await,
            Referenced::Genre(id) => self.store.books_by_genre(id).await,
        }
    }

    /// Delete an author or genre that no book references.
    ///
    /// Fails with [`AppError::ConstraintViolation`] listing the referencing
    /// books, leaving the entity untouched, or with `NotFound` when the id is
    /// unknown.
    pub async fn delete(&self, target: Referenced) -> AppResult<()> {
        let dependents = self.dependents_of(target).await?;
        if !dependents.is_empty() {
            tracing::warn!(
                "Refusing to delete {} {}: referenced by {} book(s)",
                target.kind(),
                target.id(),
                dependents.len()
            );
            return Err(AppError::ConstraintViolation {
                kind: target.kind(),
                dependents,
            });
        }

        let removed = match target {
            Referenced::Author(id) => self.store.author_delete(id).await?,
            Referenced::Genre(id) => self.store.genre_delete(id).await?,
        };
        if !removed {
            return Err(not_found(target.kind(), target.id()));
        }

        tracing::info!("Deleted {} {}", target.kind(), target.id());
        Ok(())
    }

    /// Return the genre with this name (ignoring case), creating it if needed
    pub async fn resolve_or_create_genre(&self, fields: GenreFields) -> AppResult<GenreResolution> {
        if let Some(existing) = self.store.genre_find_by_name(&fields.name).await? {
            tracing::info!(
                "Genre '{}' already exists as {} ({})",
                fields.name,
                existing.id,
                existing.name
            );
            return Ok(GenreResolution::Existing(existing));
        }

        let genre = self.store.genre_insert(&fields).await?;
        tracing::info!("Created genre {} ({})", genre.id, genre.name);
        Ok(GenreResolution::Created(genre))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockCatalogStore;
    use crate::services::testing;

    #[tokio::test]
    async fn test_referenced_author_is_not_deleted() {
        let (store, services) = testing::services();
        let author = testing::author(&store, "Patrick", "Rothfuss").await;
        let first = testing::book(&store, "The Name of the Wind", author.id, vec![]).await;
        let second = testing::book(&store, "The Wise Man's Fear", author.id, vec![]).await;

        let err = services.guard.delete(Referenced::Author(author.id)).await.unwrap_err();
        match err {
            AppError::ConstraintViolation { kind, dependents } => {
                assert_eq!(kind, EntityKind::Author);
                assert_eq!(dependents, vec![first.clone(), second.clone()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert_eq!(store.author_find(author.id).await.unwrap(), Some(author));
        assert_eq!(store.book_find(first.id).await.unwrap(), Some(first));
        assert_eq!(store.book_find(second.id).await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn test_unreferenced_genre_is_deleted() {
        let (store, services) = testing::services();
        let poetry = testing::genre(&store, "Poetry").await;

        services.guard.delete(Referenced::Genre(poetry.id)).await.unwrap();
        assert_eq!(store.genre_find(poetry.id).await.unwrap(), None);

        let again = services.guard.delete(Referenced::Genre(poetry.id)).await;
        assert!(matches!(again, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_genre_dependents_only_count_that_genre() {
        let (store, services) = testing::services();
        let author = testing::author(&store, "Ursula", "Le Guin").await;
        let fantasy = testing::genre(&store, "Fantasy").await;
        let scifi = testing::genre(&store, "Science Fiction").await;
        let book = testing::book(&store, "A Wizard of Earthsea", author.id, vec![fantasy.id]).await;

        let dependents = services.guard.dependents_of(Referenced::Genre(fantasy.id)).await.unwrap();
        assert_eq!(dependents, vec![book]);
        assert!(services
            .guard
            .dependents_of(Referenced::Genre(scifi.id))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_genre_names_resolve_ignoring_case() {
        let (store, services) = testing::services();
        let first = services
            .guard
            .resolve_or_create_genre(GenreFields { name: "Fiction".into() })
            .await
            .unwrap();
        let second = services
            .guard
            .resolve_or_create_genre(GenreFields { name: "fiction".into() })
            .await
            .unwrap();

        assert!(matches!(first, GenreResolution::Created(_)));
        assert_eq!(second, GenreResolution::Existing(first.genre().clone()));
        assert_eq!(store.count(EntityKind::Genre).await.unwrap(), 1);
        assert_eq!(store.genres_list().await.unwrap()[0].name, "Fiction");
    }

    #[tokio::test]
    async fn test_blocked_delete_never_reaches_store_delete() {
        let author = Uuid::new_v4();
        let book = Book {
            id: Uuid::new_v4(),
            title: "Kindred".into(),
            author,
            summary: "Time travel".into(),
            isbn: "9780807083697".into(),
            genre: vec![],
        };

        let mut store = MockCatalogStore::new();
        store
            .expect_books_by_author()
            .returning(move |_| Ok(vec![book.clone()]));
        store.expect_author_delete().never();

        let guard = IntegrityGuard::new(Arc::new(store));
        let result = guard.delete(Referenced::Author(author)).await;
        assert!(matches!(result, Err(AppError::ConstraintViolation { .. })));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockCatalogStore::new();
        store
            .expect_books_by_genre()
            .returning(|_| Err(AppError::Database(sqlx::Error::PoolTimedOut)));
        store.expect_genre_delete().never();

        let guard = IntegrityGuard::new(Arc::new(store));
        let result = guard.delete(Referenced::Genre(Uuid::new_v4())).await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
