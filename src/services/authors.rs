//! Author pages: list, detail, create, update and guarded delete

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{AuthorInput, EntityKind},
    repository::CatalogStore,
    validation::{sanitize, Violation},
    views::{self, AuthorView, BookView, Page, Submission},
};

use super::{
    integrity::{IntegrityGuard, Referenced},
    not_found,
};

#[derive(Debug, Clone, Serialize)]
pub struct AuthorList {
    pub author_list: Vec<AuthorView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorDetail {
    pub author: AuthorView,
    pub author_books: Vec<BookView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorForm {
    pub author: AuthorInput,
    pub errors: Vec<Violation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorDelete {
    pub author: AuthorView,
    pub author_books: Vec<BookView>,
}

#[derive(Clone)]
pub struct AuthorService {
    store: Arc<dyn CatalogStore>,
    guard: IntegrityGuard,
}

fn form_page(title: &str, author: AuthorInput, errors: Vec<Violation>) -> Page<AuthorForm> {
    Page::new("author_form", title, AuthorForm { author, errors })
}

impl AuthorService {
    pub fn new(store: Arc<dyn CatalogStore>, guard: IntegrityGuard) -> Self {
        Self { store, guard }
    }

    pub async fn list(&self) -> AppResult<Page<AuthorList>> {
        let authors = self.store.authors_list().await?;
        Ok(Page::new(
            "author_list",
            "Author List",
            AuthorList {
                author_list: views::all(authors),
            },
        ))
    }

    /// Author with all of their books
    pub async fn detail(&self, id: Uuid) -> AppResult<Page<AuthorDetail>> {
        let (author, books) = tokio::try_join!(
            self.store.author_find(id),
            self.store.books_by_author(id)
        )?;
        let author = author.ok_or_else(|| not_found(EntityKind::Author, id))?;

        Ok(Page::new(
            "author_detail",
            "Author Detail",
            AuthorDetail {
                author: author.into(),
                author_books: views::all(books),
            },
        ))
    }

    pub fn create_form(&self) -> Page<AuthorForm> {
        form_page("Create Author", AuthorInput::default(), Vec::new())
    }

    pub async fn create(&self, input: AuthorInput) -> AppResult<Submission<AuthorForm>> {
        let (_, fields) = match sanitize(input) {
            Ok(accepted) => accepted,
            Err(rejected) => {
                tracing::debug!("Author create rejected: {:?}", rejected.violations);
                return Ok(Submission::Rejected(form_page(
                    "Create Author",
                    rejected.input,
                    rejected.violations,
                )));
            }
        };

        let author = self.store.author_insert(&fields).await?;
        tracing::info!("Created author {}", author.id);
        Ok(Submission::Redirect(views::entity_url(EntityKind::Author, author.id)))
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<Page<AuthorForm>> {
        let author = self
            .store
            .author_find(id)
            .await?
            .ok_or_else(|| not_found(EntityKind::Author, id))?;
        Ok(form_page("Update Author", AuthorInput::from(&author), Vec::new()))
    }

    /// Replace all fields of an existing author
    pub async fn update(&self, id: Uuid, input: AuthorInput) -> AppResult<Submission<AuthorForm>> {
        let (_, fields) = match sanitize(input) {
            Ok(accepted) => accepted,
            Err(rejected) => {
                tracing::debug!("Author {} update rejected: {:?}", id, rejected.violations);
                return Ok(Submission::Rejected(form_page(
                    "Update Author",
                    rejected.input,
                    rejected.violations,
                )));
            }
        };

        let author = self
            .store
            .author_replace(id, &fields)
            .await?
            .ok_or_else(|| not_found(EntityKind::Author, id))?;
        tracing::info!("Updated author {}", author.id);
        Ok(Submission::Redirect(views::entity_url(EntityKind::Author, author.id)))
    }

    /// Confirmation page listing the books that would block deletion.
    /// An unknown id leads back to the author list.
    pub async fn delete_form(&self, id: Uuid) -> AppResult<Submission<AuthorDelete>> {
        let (author, books) = tokio::try_join!(
            self.store.author_find(id),
            self.guard.dependents_of(Referenced::Author(id))
        )?;
        let Some(author) = author else {
            return Ok(Submission::Redirect(views::list_url(EntityKind::Author)));
        };

        Ok(Submission::Render(delete_page(author.into(), books)))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<Submission<AuthorDelete>> {
        match self.guard.delete(Referenced::Author(id)).await {
            Ok(()) | Err(AppError::NotFound(_)) => {
                Ok(Submission::Redirect(views::list_url(EntityKind::Author)))
            }
            Err(AppError::ConstraintViolation { dependents, .. }) => {
                match self.store.author_find(id).await? {
                    Some(author) => Ok(Submission::Rejected(delete_page(author.into(), dependents))),
                    None => Ok(Submission::Redirect(views::list_url(EntityKind::Author))),
                }
            }
            Err(e) => Err(e),
        }
    }
}

fn delete_page(author: AuthorView, books: Vec<crate::models::Book>) -> Page<AuthorDelete> {
    Page::new(
        "author_delete",
        "Delete Author",
        AuthorDelete {
            author,
            author_books: views::all(books),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing;

    fn input(first: &str, family: &str) -> AuthorInput {
        AuthorInput {
            first_name: first.into(),
            family_name: family.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_redirects_to_new_author() {
        let (store, services) = testing::services();
        let submission = services.authors.create(input("Octavia", "Butler")).await.unwrap();

        let authors = store.authors_list().await.unwrap();
        assert_eq!(authors.len(), 1);
        assert_eq!(
            submission.redirect_url(),
            Some(format!("/catalog/authors/{}", authors[0].id).as_str())
        );
    }

    #[tokio::test]
    async fn test_rejected_create_redisplays_input() {
        let (store, services) = testing::services();
        let submission = services.authors.create(input(" Octavia ", "")).await.unwrap();

        let Submission::Rejected(page) = submission else {
            panic!("expected the form again");
        };
        assert_eq!(page.view, "author_form");
        assert_eq!(page.data.author.first_name, "Octavia");
        assert_eq!(page.data.errors.len(), 1);
        assert_eq!(page.data.errors[0].field, "family_name");
        assert!(store.authors_list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_detail_joins_books() {
        let (store, services) = testing::services();
        let author = testing::author(&store, "Ann", "Leckie").await;
        let book = testing::book(&store, "Ancillary Justice", author.id, vec![]).await;

        let page = services.authors.detail(author.id).await.unwrap();
        assert_eq!(page.data.author.name, "Leckie, Ann");
        assert_eq!(page.data.author_books.len(), 1);
        assert_eq!(page.data.author_books[0].book, book);
    }

    #[tokio::test]
    async fn test_update_replaces_all_fields() {
        let (store, services) = testing::services();
        let author = testing::author(&store, "Ann", "Leckie").await;
        assert!(author.date_of_birth.is_some());

        services
            .authors
            .update(author.id, input("Anne", "Leckie"))
            .await
            .unwrap();
        let stored = store.author_find(author.id).await.unwrap().unwrap();
        assert_eq!(stored.first_name, "Anne");
        assert_eq!(stored.date_of_birth, None);
    }

    #[tokio::test]
    async fn test_update_unknown_author_is_not_found() {
        let (_, services) = testing::services();
        let result = services.authors.update(Uuid::new_v4(), input("A", "B")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_blocked_by_books_shows_them() {
        let (store, services) = testing::services();
        let author = testing::author(&store, "Ann", "Leckie").await;
        let book = testing::book(&store, "Ancillary Sword", author.id, vec![]).await;

        let Submission::Rejected(page) = services.authors.delete(author.id).await.unwrap() else {
            panic!("expected the confirmation page again");
        };
        assert_eq!(page.view, "author_delete");
        assert_eq!(page.data.author_books[0].book, book);
        assert!(store.author_find(author.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_then_detail_is_not_found() {
        let (store, services) = testing::services();
        let author = testing::author(&store, "Ann", "Leckie").await;

        let submission = services.authors.delete(author.id).await.unwrap();
        assert_eq!(submission.redirect_url(), Some("/catalog/authors"));
        let detail = services.authors.detail(author.id).await;
        assert!(matches!(detail, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_form_for_unknown_author_redirects() {
        let (_, services) = testing::services();
        let submission = services.authors.delete_form(Uuid::new_v4()).await.unwrap();
        assert_eq!(submission.redirect_url(), Some("/catalog/authors"));
    }
}
