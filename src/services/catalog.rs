//! Catalog home: record counts across the whole catalog

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{BookInstanceStatus, EntityKind},
    repository::CatalogStore,
    views::Page,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CatalogCounts {
    pub book_count: i64,
    pub book_instance_count: i64,
    pub book_instance_available_count: i64,
    pub author_count: i64,
    pub genre_count: i64,
}

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub async fn summary(&self) -> AppResult<Page<CatalogCounts>> {
        let (books, instances, available, authors, genres) = tokio::try_join!(
            self.store.count(EntityKind::Book),
            self.store.count(EntityKind::BookInstance),
            self.store.instances_count_with_status(BookInstanceStatus::Available),
            self.store.count(EntityKind::Author),
            self.store.count(EntityKind::Genre),
        )?;

        Ok(Page::new(
            "index",
            "Local Library Home",
            CatalogCounts {
                book_count: books,
                book_instance_count: instances,
                book_instance_available_count: available,
                author_count: authors,
                genre_count: genres,
            },
        ))
    }

    /// Readiness of the underlying store
    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::repository::MockCatalogStore;
    use crate::services::testing;

    #[tokio::test]
    async fn test_summary_counts() {
        let (store, services) = testing::services();
        let author = testing::author(&store, "Terry", "Pratchett").await;
        testing::genre(&store, "Fantasy").await;
        let book = testing::book(&store, "Mort", author.id, vec![]).await;
        testing::copy(&store, book.id, BookInstanceStatus::Available).await;
        testing::copy(&store, book.id, BookInstanceStatus::Maintenance).await;

        let page = services.catalog.summary().await.unwrap();
        assert_eq!(page.view, "index");
        assert_eq!(
            page.data,
            CatalogCounts {
                book_count: 1,
                book_instance_count: 2,
                book_instance_available_count: 1,
                author_count: 1,
                genre_count: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_one_failed_count_fails_summary() {
        let mut store = MockCatalogStore::new();
        store.expect_count().returning(|kind| match kind {
            EntityKind::Genre => Err(AppError::Database(sqlx::Error::PoolClosed)),
            _ => Ok(3),
        });
        store.expect_instances_count_with_status().returning(|_| Ok(1));

        let service = CatalogService::new(Arc::new(store));
        assert!(matches!(service.summary().await, Err(AppError::Database(_))));
    }
}
