//! In-process entity store
//!
//! Tables are insertion-ordered maps behind a single async lock. Used when
//! `database.backend = "memory"` and by the service tests.

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::CatalogStore;
use crate::{
    error::AppResult,
    models::{
        genre::name_key, Author, AuthorFields, Book, BookFields, BookInstance, BookInstanceFields,
        BookInstanceStatus, EntityKind, Genre, GenreFields,
    },
};

#[derive(Default)]
struct Tables {
    authors: IndexMap<Uuid, Author>,
    genres: IndexMap<Uuid, Genre>,
    books: IndexMap<Uuid, Book>,
    instances: IndexMap<Uuid, BookInstance>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn pick<T: Clone>(table: &IndexMap<Uuid, T>, ids: &[Uuid]) -> Vec<T> {
    ids.iter().filter_map(|id| table.get(id).cloned()).collect()
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn close(&self) {}

    async fn count(&self, kind: EntityKind) -> AppResult<i64> {
        let tables = self.tables.read().await;
        let len = match kind {
            EntityKind::Author => tables.authors.len(),
            EntityKind::Genre => tables.genres.len(),
            EntityKind::Book => tables.books.len(),
            EntityKind::BookInstance => tables.instances.len(),
        };
        Ok(len as i64)
    }

    async fn author_find(&self, id: Uuid) -> AppResult<Option<Author>> {
        Ok(self.tables.read().await.authors.get(&id).cloned())
    }

    async fn authors_list(&self) -> AppResult<Vec<Author>> {
        Ok(self.tables.read().await.authors.values().cloned().collect())
    }

    async fn authors_find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Author>> {
        Ok(pick(&self.tables.read().await.authors, ids))
    }

    async fn author_insert(&self, fields: &AuthorFields) -> AppResult<Author> {
        let author = Author::from_fields(Uuid::new_v4(), fields.clone());
        self.tables.write().await.authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn author_replace(&self, id: Uuid, fields: &AuthorFields) -> AppResult<Option<Author>> {
        let mut tables = self.tables.write().await;
        Ok(tables.authors.get_mut(&id).map(|slot| {
            *slot = Author::from_fields(id, fields.clone());
            slot.clone()
        }))
    }

    async fn author_delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.tables.write().await.authors.shift_remove(&id).is_some())
    }

    async fn genre_find(&self, id: Uuid) -> AppResult<Option<Genre>> {
        Ok(self.tables.read().await.genres.get(&id).cloned())
    }

    async fn genres_list(&self) -> AppResult<Vec<Genre>> {
        let mut genres: Vec<Genre> = self.tables.read().await.genres.values().cloned().collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    async fn genre_find_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        let key = name_key(name);
        let tables = self.tables.read().await;
        Ok(tables.genres.values().find(|g| name_key(&g.name) == key).cloned())
    }

    async fn genres_find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Genre>> {
        let mut genres = pick(&self.tables.read().await.genres, ids);
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    async fn genre_insert(&self, fields: &GenreFields) -> AppResult<Genre> {
        let genre = Genre::from_fields(Uuid::new_v4(), fields.clone());
        self.tables.write().await.genres.insert(genre.id, genre.clone());
        Ok(genre)
    }

    async fn genre_replace(&self, id: Uuid, fields: &GenreFields) -> AppResult<Option<Genre>> {
        let mut tables = self.tables.write().await;
        Ok(tables.genres.get_mut(&id).map(|slot| {
            *slot = Genre::from_fields(id, fields.clone());
            slot.clone()
        }))
    }

    async fn genre_delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.tables.write().await.genres.shift_remove(&id).is_some())
    }

    async fn book_find(&self, id: Uuid) -> AppResult<Option<Book>> {
        Ok(self.tables.read().await.books.get(&id).cloned())
    }

    async fn books_list(&self) -> AppResult<Vec<Book>> {
        Ok(self.tables.read().await.books.values().cloned().collect())
    }

    async fn books_list_by_title(&self) -> AppResult<Vec<Book>> {
        let mut books = self.books_list().await?;
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }

    async fn books_by_author(&self, author: Uuid) -> AppResult<Vec<Book>> {
        let tables = self.tables.read().await;
        Ok(tables.books.values().filter(|b| b.author == author).cloned().collect())
    }

    async fn books_by_genre(&self, genre: Uuid) -> AppResult<Vec<Book>> {
        let tables = self.tables.read().await;
        Ok(tables.books.values().filter(|b| b.genre.contains(&genre)).cloned().collect())
    }

    async fn books_find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Book>> {
        Ok(pick(&self.tables.read().await.books, ids))
    }

    async fn book_insert(&self, fields: &BookFields) -> AppResult<Book> {
        let book = Book::from_fields(Uuid::new_v4(), fields.clone());
        self.tables.write().await.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn book_replace(&self, id: Uuid, fields: &BookFields) -> AppResult<Option<Book>> {
        let mut tables = self.tables.write().await;
        Ok(tables.books.get_mut(&id).map(|slot| {
            *slot = Book::from_fields(id, fields.clone());
            slot.clone()
        }))
    }

    async fn book_delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.tables.write().await.books.shift_remove(&id).is_some())
    }

    async fn instance_find(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        Ok(self.tables.read().await.instances.get(&id).cloned())
    }

    async fn instances_list(&self) -> AppResult<Vec<BookInstance>> {
        Ok(self.tables.read().await.instances.values().cloned().collect())
    }

    async fn instances_by_book(&self, book: Uuid) -> AppResult<Vec<BookInstance>> {
        let tables = self.tables.read().await;
        Ok(tables.instances.values().filter(|i| i.book == book).cloned().collect())
    }

    async fn instances_count_with_status(&self, status: BookInstanceStatus) -> AppResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables.instances.values().filter(|i| i.status == status).count() as i64)
    }

    async fn instance_insert(&self, fields: &BookInstanceFields) -> AppResult<BookInstance> {
        let instance = BookInstance::from_fields(Uuid::new_v4(), fields.clone());
        self.tables.write().await.instances.insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn instance_replace(
        &self,
        id: Uuid,
        fields: &BookInstanceFields,
    ) -> AppResult<Option<BookInstance>> {
        let mut tables = self.tables.write().await;
        Ok(tables.instances.get_mut(&id).map(|slot| {
            *slot = BookInstance::from_fields(id, fields.clone());
            slot.clone()
        }))
    }

    async fn instance_delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.tables.write().await.instances.shift_remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_genre_lookup_ignores_case() {
        let store = MemoryStore::new();
        let fiction = store
            .genre_insert(&GenreFields { name: "Fiction".into() })
            .await
            .unwrap();
        let found = store.genre_find_by_name("FICTION").await.unwrap();
        assert_eq!(found, Some(fiction));
        assert_eq!(store.genre_find_by_name("Poetry").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_genres_sorted_by_name() {
        let store = MemoryStore::new();
        for name in ["Poetry", "Fantasy", "Horror"] {
            store.genre_insert(&GenreFields { name: name.into() }).await.unwrap();
        }
        let names: Vec<String> = store
            .genres_list()
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["Fantasy", "Horror", "Poetry"]);
    }

    #[tokio::test]
    async fn test_replace_and_delete_missing_id() {
        let store = MemoryStore::new();
        let fields = GenreFields { name: "Drama".into() };
        assert_eq!(store.genre_replace(Uuid::new_v4(), &fields).await.unwrap(), None);
        assert!(!store.genre_delete(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_books_filtered_by_reference() {
        let store = MemoryStore::new();
        let author = Uuid::new_v4();
        let genre = Uuid::new_v4();
        let fields = BookFields {
            title: "Neuromancer".into(),
            author,
            summary: "Cyberspace".into(),
            isbn: "9780441569595".into(),
            genre: vec![genre],
        };
        let book = store.book_insert(&fields).await.unwrap();
        assert_eq!(store.books_by_author(author).await.unwrap(), vec![book.clone()]);
        assert_eq!(store.books_by_genre(genre).await.unwrap(), vec![book]);
        assert!(store.books_by_genre(Uuid::new_v4()).await.unwrap().is_empty());
    }
}
