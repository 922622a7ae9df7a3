//! Business logic services
//!
//! One service per entity kind turns requests into page data, plus the
//! integrity guard they share for deletions and genre de-duplication.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;
pub mod integrity;

use std::sync::Arc;

use uuid::Uuid;

use crate::{error::AppError, models::EntityKind, repository::CatalogStore};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn CatalogStore>,
    pub guard: integrity::IntegrityGuard,
    pub catalog: catalog::CatalogService,
    pub authors: authors::AuthorService,
    pub genres: genres::GenreService,
    pub books: books::BookService,
    pub book_instances: book_instances::BookInstanceService,
}

impl Services {
    /// Create all services over the given store
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        let guard = integrity::IntegrityGuard::new(store.clone());
        Self {
            catalog: catalog::CatalogService::new(store.clone()),
            authors: authors::AuthorService::new(store.clone(), guard.clone()),
            genres: genres::GenreService::new(store.clone(), guard.clone()),
            books: books::BookService::new(store.clone()),
            book_instances: book_instances::BookInstanceService::new(store.clone()),
            guard,
            store,
        }
    }
}

pub(crate) fn not_found(kind: EntityKind, id: Uuid) -> AppError {
    AppError::NotFound(format!("{} {} not found", kind, id))
}

/// Distinct ids in first-seen order
pub(crate) fn unique_ids(ids: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
    let mut unique = Vec::new();
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}
