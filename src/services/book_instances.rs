//! Book instance (copy) pages: list, detail, create, update and delete

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Book, BookInstanceInput, BookInstanceStatus, EntityKind},
    repository::CatalogStore,
    validation::{sanitize, Rejected, Violation},
    views::{self, BookInstanceView, BookView, Page, Submission},
};

use super::{not_found, unique_ids};

#[derive(Debug, Clone, Serialize)]
pub struct BookInstanceListEntry {
    pub bookinstance: BookInstanceView,
    pub book: Option<BookView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookInstanceList {
    pub bookinstance_list: Vec<BookInstanceListEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookInstanceDetail {
    pub bookinstance: BookInstanceView,
    /// `None` when the copy outlived its book
    pub book: Option<BookView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookInstanceForm {
    pub bookinstance: BookInstanceInput,
    pub book_list: Vec<BookView>,
    pub selected_book: String,
    pub statuses: Vec<BookInstanceStatus>,
    pub errors: Vec<Violation>,
}

#[derive(Clone)]
pub struct BookInstanceService {
    store: Arc<dyn CatalogStore>,
}

fn build_form(
    title: &str,
    bookinstance: BookInstanceInput,
    books: Vec<Book>,
    errors: Vec<Violation>,
) -> Page<BookInstanceForm> {
    Page::new(
        "bookinstance_form",
        title,
        BookInstanceForm {
            selected_book: bookinstance.book.clone(),
            bookinstance,
            book_list: views::all(books),
            statuses: BookInstanceStatus::ALL.to_vec(),
            errors,
        },
    )
}

impl BookInstanceService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// All copies, each with its book joined
    pub async fn list(&self) -> AppResult<Page<BookInstanceList>> {
        let instances = self.store.instances_list().await?;
        let book_ids = unique_ids(instances.iter().map(|i| i.book));
        let books = self.store.books_find_many(&book_ids).await?;

        let bookinstance_list = instances
            .into_iter()
            .map(|instance| BookInstanceListEntry {
                book: books
                    .iter()
                    .find(|b| b.id == instance.book)
                    .cloned()
                    .map(BookView::from),
                bookinstance: instance.into(),
            })
            .collect();
        Ok(Page::new(
            "bookinstance_list",
            "Book Instance List",
            BookInstanceList { bookinstance_list },
        ))
    }

    async fn find_with_book(&self, id: Uuid) -> AppResult<Option<(BookInstanceView, Option<BookView>)>> {
        let Some(instance) = self.store.instance_find(id).await? else {
            return Ok(None);
        };
        let book = self.store.book_find(instance.book).await?;
        Ok(Some((instance.into(), book.map(BookView::from))))
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<Page<BookInstanceDetail>> {
        let (bookinstance, book) = self
            .find_with_book(id)
            .await?
            .ok_or_else(|| not_found(EntityKind::BookInstance, id))?;
        Ok(Page::new(
            "bookinstance_detail",
            "Book Instance Detail",
            BookInstanceDetail { bookinstance, book },
        ))
    }

    async fn rejected(
        &self,
        title: &str,
        rejected: Rejected<BookInstanceInput>,
    ) -> AppResult<Submission<BookInstanceForm>> {
        tracing::debug!("Book instance form rejected: {:?}", rejected.violations);
        let books = self.store.books_list_by_title().await?;
        Ok(Submission::Rejected(build_form(
            title,
            rejected.input,
            books,
            rejected.violations,
        )))
    }

    pub async fn create_form(&self) -> AppResult<Page<BookInstanceForm>> {
        let books = self.store.books_list_by_title().await?;
        Ok(build_form(
            "Create Book Instance",
            BookInstanceInput::default(),
            books,
            Vec::new(),
        ))
    }

    pub async fn create(&self, input: BookInstanceInput) -> AppResult<Submission<BookInstanceForm>> {
        let (_, fields) = match sanitize(input) {
            Ok(accepted) => accepted,
            Err(rejected) => return self.rejected("Create Book Instance", rejected).await,
        };

        let instance = self.store.instance_insert(&fields).await?;
        tracing::info!("Created book instance {} of book {}", instance.id, instance.book);
        Ok(Submission::Redirect(views::entity_url(
            EntityKind::BookInstance,
            instance.id,
        )))
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<Page<BookInstanceForm>> {
        let (instance, books) = tokio::try_join!(
            self.store.instance_find(id),
            self.store.books_list_by_title()
        )?;
        let instance = instance.ok_or_else(|| not_found(EntityKind::BookInstance, id))?;
        Ok(build_form(
            "Update Book Instance",
            BookInstanceInput::from(&instance),
            books,
            Vec::new(),
        ))
    }

    pub async fn update(
        &self,
        id: Uuid,
        input: BookInstanceInput,
    ) -> AppResult<Submission<BookInstanceForm>> {
        let (_, fields) = match sanitize(input) {
            Ok(accepted) => accepted,
            Err(rejected) => return self.rejected("Update Book Instance", rejected).await,
        };

        let instance = self
            .store
            .instance_replace(id, &fields)
            .await?
            .ok_or_else(|| not_found(EntityKind::BookInstance, id))?;
        tracing::info!("Updated book instance {}", instance.id);
        Ok(Submission::Redirect(views::entity_url(
            EntityKind::BookInstance,
            instance.id,
        )))
    }

    pub async fn delete_form(&self, id: Uuid) -> AppResult<Submission<BookInstanceDetail>> {
        let Some((bookinstance, book)) = self.find_with_book(id).await? else {
            return Ok(Submission::Redirect(views::list_url(EntityKind::BookInstance)));
        };
        Ok(Submission::Render(Page::new(
            "bookinstance_delete",
            "Delete Book Instance",
            BookInstanceDetail { bookinstance, book },
        )))
    }

    /// Nothing references a copy, so deletion is unguarded
    pub async fn delete(&self, id: Uuid) -> AppResult<Submission<BookInstanceDetail>> {
        if self.store.instance_delete(id).await? {
            tracing::info!("Deleted book instance {}", id);
        }
        Ok(Submission::Redirect(views::list_url(EntityKind::BookInstance)))
    }
}
