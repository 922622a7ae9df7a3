//! Book pages: list, detail, create, update and delete
//!
//! Deleting a book does not touch its copies; they keep referencing the
//! removed book.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Author, Book, BookInput, EntityKind, Genre},
    repository::CatalogStore,
    validation::{sanitize, Rejected, Violation},
    views::{self, AuthorView, BookInstanceView, BookView, GenreView, Page, Submission},
};

use super::{not_found, unique_ids};

#[derive(Debug, Clone, Serialize)]
pub struct BookListEntry {
    pub book: BookView,
    /// `None` when the referenced author no longer exists
    pub author: Option<AuthorView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookList {
    pub book_list: Vec<BookListEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookDetail {
    pub book: BookView,
    pub author: Option<AuthorView>,
    pub genres: Vec<GenreView>,
    pub book_instances: Vec<BookInstanceView>,
}

/// A genre offered in the book form
#[derive(Debug, Clone, Serialize)]
pub struct GenreChoice {
    #[serde(flatten)]
    pub genre: GenreView,
    pub checked: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookForm {
    pub book: BookInput,
    pub authors: Vec<AuthorView>,
    pub genres: Vec<GenreChoice>,
    pub errors: Vec<Violation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookDelete {
    pub book: BookView,
    pub book_instances: Vec<BookInstanceView>,
}

#[derive(Clone)]
pub struct BookService {
    store: Arc<dyn CatalogStore>,
}

impl BookService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// All books, each with its author joined
    pub async fn list(&self) -> AppResult<Page<BookList>> {
        let books = self.store.books_list().await?;
        let author_ids = unique_ids(books.iter().map(|b| b.author));
        let authors = self.store.authors_find_many(&author_ids).await?;

        let book_list = books
            .into_iter()
            .map(|book| BookListEntry {
                author: authors
                    .iter()
                    .find(|a| a.id == book.author)
                    .cloned()
                    .map(AuthorView::from),
                book: book.into(),
            })
            .collect();
        Ok(Page::new("book_list", "Book List", BookList { book_list }))
    }

    /// Book with its author and genres joined
    async fn find_joined(&self, id: Uuid) -> AppResult<Option<(Book, Option<Author>, Vec<Genre>)>> {
        let Some(book) = self.store.book_find(id).await? else {
            return Ok(None);
        };
        let (author, genres) = tokio::try_join!(
            self.store.author_find(book.author),
            self.store.genres_find_many(&book.genre)
        )?;
        Ok(Some((book, author, genres)))
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<Page<BookDetail>> {
        let (joined, instances) =
            tokio::try_join!(self.find_joined(id), self.store.instances_by_book(id))?;
        let (book, author, genres) = joined.ok_or_else(|| not_found(EntityKind::Book, id))?;

        Ok(Page::new(
            "book_detail",
            book.title.clone(),
            BookDetail {
                book: book.into(),
                author: author.map(AuthorView::from),
                genres: views::all(genres),
                book_instances: views::all(instances),
            },
        ))
    }

    /// Form page with every author and genre available for selection
    async fn form_page(
        &self,
        title: &str,
        book: BookInput,
        errors: Vec<Violation>,
    ) -> AppResult<Page<BookForm>> {
        let (authors, genres) =
            tokio::try_join!(self.store.authors_list(), self.store.genres_list())?;
        Ok(build_form(title, book, authors, genres, errors))
    }

    async fn rejected(&self, title: &str, rejected: Rejected<BookInput>) -> AppResult<Submission<BookForm>> {
        tracing::debug!("Book form rejected: {:?}", rejected.violations);
        let page = self.form_page(title, rejected.input, rejected.violations).await?;
        Ok(Submission::Rejected(page))
    }

    pub async fn create_form(&self) -> AppResult<Page<BookForm>> {
        self.form_page("Create Book", BookInput::default(), Vec::new()).await
    }

    pub async fn create(&self, input: BookInput) -> AppResult<Submission<BookForm>> {
        let (input, fields) = match sanitize(input) {
            Ok(accepted) => accepted,
            Err(rejected) => return self.rejected("Create Book", rejected).await,
        };

        if self.store.author_find(fields.author).await?.is_none() {
            let violation = Violation::new("author", "Author not found.");
            return self.rejected("Create Book", Rejected::single(input, violation)).await;
        }

        let book = self.store.book_insert(&fields).await?;
        tracing::info!("Created book {} ({})", book.id, book.title);
        Ok(Submission::Redirect(views::entity_url(EntityKind::Book, book.id)))
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<Page<BookForm>> {
        let (book, authors, genres) = tokio::try_join!(
            self.store.book_find(id),
            self.store.authors_list(),
            self.store.genres_list()
        )?;
        let book = book.ok_or_else(|| not_found(EntityKind::Book, id))?;
        Ok(build_form(
            "Update Book",
            BookInput::from(&book),
            authors,
            genres,
            Vec::new(),
        ))
    }

    /// Replace all fields of an existing book, including its genre set
    pub async fn update(&self, id: Uuid, input: BookInput) -> AppResult<Submission<BookForm>> {
        let (input, fields) = match sanitize(input) {
            Ok(accepted) => accepted,
            Err(rejected) => return self.rejected("Update Book", rejected).await,
        };

        if self.store.author_find(fields.author).await?.is_none() {
            let violation = Violation::new("author", "Author not found.");
            return self.rejected("Update Book", Rejected::single(input, violation)).await;
        }

        let book = self
            .store
            .book_replace(id, &fields)
            .await?
            .ok_or_else(|| not_found(EntityKind::Book, id))?;
        tracing::info!("Updated book {}", book.id);
        Ok(Submission::Redirect(views::entity_url(EntityKind::Book, book.id)))
    }

    pub async fn delete_form(&self, id: Uuid) -> AppResult<Submission<BookDelete>> {
        let (book, instances) =
            tokio::try_join!(self.store.book_find(id), self.store.instances_by_book(id))?;
        let Some(book) = book else {
            return Ok(Submission::Redirect(views::list_url(EntityKind::Book)));
        };

        Ok(Submission::Render(Page::new(
            "book_delete",
            "Delete Book",
            BookDelete {
                book: book.into(),
                book_instances: views::all(instances),
            },
        )))
    }

    /// Delete a book. Copies of it are not checked and stay in the catalog.
    pub async fn delete(&self, id: Uuid) -> AppResult<Submission<BookDelete>> {
        let instances = self.store.instances_by_book(id).await?;
        if self.store.book_delete(id).await? {
            if instances.is_empty() {
                tracing::info!("Deleted book {}", id);
            } else {
                tracing::warn!(
                    "Deleted book {}; {} copies still reference it",
                    id,
                    instances.len()
                );
            }
        }
        Ok(Submission::Redirect(views::list_url(EntityKind::Book)))
    }
}

fn build_form(
    title: &str,
    book: BookInput,
    authors: Vec<Author>,
    genres: Vec<Genre>,
    errors: Vec<Violation>,
) -> Page<BookForm> {
    let genres = genres
        .into_iter()
        .map(|genre| GenreChoice {
            checked: book.has_genre(genre.id),
            genre: genre.into(),
        })
        .collect();
    Page::new(
        "book_form",
        title,
        BookForm {
            book,
            authors: views::all(authors),
            genres,
            errors,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookInstanceStatus;
    use crate::services::testing;

    fn input(author: &str, genre: Vec<String>) -> BookInput {
        BookInput {
            title: "The Left Hand of Darkness".into(),
            author: author.into(),
            summary: "Winter".into(),
            isbn: "9780441478125".into(),
            genre,
        }
    }

    #[tokio::test]
    async fn test_create_without_author_is_rejected() {
        let (store, services) = testing::services();
        testing::author(&store, "Robert", "Martin").await;
        let book = BookInput {
            title: "Clean Architecture".into(),
            author: "".into(),
            summary: "Boundaries".into(),
            isbn: "0-13-468599-1".into(),
            genre: vec![],
        };

        let Submission::Rejected(page) = services.books.create(book).await.unwrap() else {
            panic!("expected the form again");
        };
        assert_eq!(page.data.book.isbn, "0-13-468599-1");
        assert_eq!(page.data.book.author, "");
        assert_eq!(page.data.authors.len(), 1);
        assert!(page.data.errors.iter().any(|e| e.field == "author"));
        assert_eq!(store.count(EntityKind::Book).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rejected_form_keeps_selected_genres() {
        let (store, services) = testing::services();
        let fantasy = testing::genre(&store, "Fantasy").await;
        let horror = testing::genre(&store, "Horror").await;
        let mut book = input("", vec![fantasy.id.to_string()]);
        book.title = String::new();

        let Submission::Rejected(page) = services.books.create(book).await.unwrap() else {
            panic!("expected the form again");
        };
        let checked: Vec<(Uuid, bool)> = page
            .data
            .genres
            .iter()
            .map(|g| (g.genre.genre.id, g.checked))
            .collect();
        assert_eq!(checked, vec![(fantasy.id, true), (horror.id, false)]);
        let fields: Vec<&str> = page.data.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "author"]);
    }

    #[tokio::test]
    async fn test_create_with_unknown_author_is_rejected() {
        let (store, services) = testing::services();
        let submission = services
            .books
            .create(input(&Uuid::new_v4().to_string(), vec![]))
            .await
            .unwrap();
        let Submission::Rejected(page) = submission else {
            panic!("expected the form again");
        };
        assert_eq!(page.data.errors, vec![Violation::new("author", "Author not found.")]);
        assert_eq!(store.count(EntityKind::Book).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_and_detail_joins_references() {
        let (store, services) = testing::services();
        let author = testing::author(&store, "Ursula", "Le Guin").await;
        let scifi = testing::genre(&store, "Science Fiction").await;

        let submission = services
            .books
            .create(input(&author.id.to_string(), vec![scifi.id.to_string()]))
            .await
            .unwrap();
        let books = store.books_list().await.unwrap();
        assert_eq!(books.len(), 1);
        let url = format!("/catalog/books/{}", books[0].id);
        assert_eq!(submission.redirect_url(), Some(url.as_str()));

        testing::copy(&store, books[0].id, BookInstanceStatus::Available).await;
        let page = services.books.detail(books[0].id).await.unwrap();
        assert_eq!(page.data.author.map(|a| a.name), Some("Le Guin, Ursula".to_string()));
        assert_eq!(page.data.genres.len(), 1);
        assert_eq!(page.data.genres[0].genre, scifi);
        assert_eq!(page.data.book_instances.len(), 1);
    }

    #[tokio::test]
    async fn test_update_form_preselects_current_relations() {
        let (store, services) = testing::services();
        let author = testing::author(&store, "Ursula", "Le Guin").await;
        let fantasy = testing::genre(&store, "Fantasy").await;
        testing::genre(&store, "Romance").await;
        let book = testing::book(&store, "Tehanu", author.id, vec![fantasy.id]).await;

        let page = services.books.update_form(book.id).await.unwrap();
        assert_eq!(page.data.book.author, author.id.to_string());
        let checked: Vec<bool> = page.data.genres.iter().map(|g| g.checked).collect();
        assert_eq!(checked, vec![true, false]);
    }

    #[tokio::test]
    async fn test_update_replaces_genre_set() {
        let (store, services) = testing::services();
        let author = testing::author(&store, "Ursula", "Le Guin").await;
        let fantasy = testing::genre(&store, "Fantasy").await;
        let book = testing::book(&store, "Tehanu", author.id, vec![fantasy.id]).await;

        services
            .books
            .update(book.id, input(&author.id.to_string(), vec![]))
            .await
            .unwrap();
        let stored = store.book_find(book.id).await.unwrap().unwrap();
        assert!(stored.genre.is_empty());
        assert_eq!(stored.title, "The Left Hand of Darkness");
    }

    #[tokio::test]
    async fn test_delete_leaves_copies_in_place() {
        let (store, services) = testing::services();
        let author = testing::author(&store, "Ursula", "Le Guin").await;
        let book = testing::book(&store, "Tehanu", author.id, vec![]).await;
        let copy = testing::copy(&store, book.id, BookInstanceStatus::Reserved).await;

        let submission = services.books.delete(book.id).await.unwrap();
        assert_eq!(submission.redirect_url(), Some("/catalog/books"));
        assert_eq!(store.book_find(book.id).await.unwrap(), None);
        assert_eq!(store.instance_find(copy.id).await.unwrap(), Some(copy));
    }

    #[tokio::test]
    async fn test_list_joins_authors() {
        let (store, services) = testing::services();
        let author = testing::author(&store, "Ursula", "Le Guin").await;
        testing::book(&store, "Tehanu", author.id, vec![]).await;
        testing::book(&store, "Orphan", Uuid::new_v4(), vec![]).await;

        let page = services.books.list().await.unwrap();
        assert_eq!(page.data.book_list.len(), 2);
        assert_eq!(
            page.data.book_list[0].author.as_ref().map(|a| a.name.as_str()),
            Some("Le Guin, Ursula")
        );
        assert!(page.data.book_list[1].author.is_none());
    }

    #[tokio::test]
    async fn test_list_entries_keep_book_and_author_apart() {
        #[derive(serde::Deserialize)]
        struct Entry {
            book: serde_json::Value,
            author: Option<serde_json::Value>,
        }

        let (store, services) = testing::services();
        let author = testing::author(&store, "Ursula", "Le Guin").await;
        let book = testing::book(&store, "Tehanu", author.id, vec![]).await;

        let page = services.books.list().await.unwrap();
        let json = serde_json::to_string(&page.data.book_list[0]).unwrap();
        // Derived deserializers reject repeated keys
        let entry: Entry = serde_json::from_str(&json).unwrap();

        assert_eq!(entry.book["title"], "Tehanu");
        assert_eq!(entry.book["author"], author.id.to_string());
        assert_eq!(entry.book["url"], format!("/catalog/books/{}", book.id));
        assert_eq!(entry.author.unwrap()["name"], "Le Guin, Ursula");
    }
}
