//! Genre pages: list, detail, create (de-duplicated), update and guarded delete

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Book, EntityKind, GenreInput},
    repository::CatalogStore,
    validation::{sanitize, Violation},
    views::{self, BookView, GenreView, Page, Submission},
};

use super::{
    integrity::{GenreResolution, IntegrityGuard, Referenced},
    not_found,
};

#[derive(Debug, Clone, Serialize)]
pub struct GenreList {
    pub genre_list: Vec<GenreView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenreDetail {
    pub genre: GenreView,
    pub genre_books: Vec<BookView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenreForm {
    pub genre: GenreInput,
    pub errors: Vec<Violation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenreDelete {
    pub genre: GenreView,
    pub genre_books: Vec<BookView>,
}

#[derive(Clone)]
pub struct GenreService {
    store: Arc<dyn CatalogStore>,
    guard: IntegrityGuard,
}

fn form_page(title: &str, genre: GenreInput, errors: Vec<Violation>) -> Page<GenreForm> {
    Page::new("genre_form", title, GenreForm { genre, errors })
}

fn delete_page(genre: GenreView, books: Vec<Book>) -> Page<GenreDelete> {
    Page::new(
        "genre_delete",
        "Delete Genre",
        GenreDelete {
            genre,
            genre_books: views::all(books),
        },
    )
}

impl GenreService {
    pub fn new(store: Arc<dyn CatalogStore>, guard: IntegrityGuard) -> Self {
        Self { store, guard }
    }

    /// All genres sorted by name
    pub async fn list(&self) -> AppResult<Page<GenreList>> {
        let genres = self.store.genres_list().await?;
        Ok(Page::new(
            "genre_list",
            "Genre List",
            GenreList {
                genre_list: views::all(genres),
            },
        ))
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<Page<GenreDetail>> {
        let (genre, books) = tokio::try_join!(
            self.store.genre_find(id),
            self.store.books_by_genre(id)
        )?;
        let genre = genre.ok_or_else(|| not_found(EntityKind::Genre, id))?;

        Ok(Page::new(
            "genre_detail",
            "Genre Detail",
            GenreDetail {
                genre: genre.into(),
                genre_books: views::all(books),
            },
        ))
    }

    pub fn create_form(&self) -> Page<GenreForm> {
        form_page("Create Genre", GenreInput::default(), Vec::new())
    }

    /// Create a genre, or lead to the existing one if the name is taken
    pub async fn create(&self, input: GenreInput) -> AppResult<Submission<GenreForm>> {
        let (_, fields) = match sanitize(input) {
            Ok(accepted) => accepted,
            Err(rejected) => {
                tracing::debug!("Genre create rejected: {:?}", rejected.violations);
                return Ok(Submission::Rejected(form_page(
                    "Create Genre",
                    rejected.input,
                    rejected.violations,
                )));
            }
        };

        let resolution = self.guard.resolve_or_create_genre(fields).await?;
        if let GenreResolution::Existing(genre) = &resolution {
            tracing::debug!("Genre create resolved to existing genre {}", genre.id);
        }
        Ok(Submission::Redirect(views::entity_url(
            EntityKind::Genre,
            resolution.genre().id,
        )))
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<Page<GenreForm>> {
        let genre = self
            .store
            .genre_find(id)
            .await?
            .ok_or_else(|| not_found(EntityKind::Genre, id))?;
        Ok(form_page("Update Genre", GenreInput::from(&genre), Vec::new()))
    }

    /// Rename a genre. The new name must not belong to another genre.
    pub async fn update(&self, id: Uuid, input: GenreInput) -> AppResult<Submission<GenreForm>> {
        let (input, fields) = match sanitize(input) {
            Ok(accepted) => accepted,
            Err(rejected) => {
                tracing::debug!("Genre {} update rejected: {:?}", id, rejected.violations);
                return Ok(Submission::Rejected(form_page(
                    "Update Genre",
                    rejected.input,
                    rejected.violations,
                )));
            }
        };

        let (current, same_name) = tokio::try_join!(
            self.store.genre_find(id),
            self.store.genre_find_by_name(&fields.name)
        )?;
        if current.is_none() {
            return Err(not_found(EntityKind::Genre, id));
        }
        if same_name.is_some_and(|other| other.id != id) {
            return Ok(Submission::Rejected(form_page(
                "Update Genre",
                input,
                vec![Violation::new("name", "Genre already exists.")],
            )));
        }

        let genre = self
            .store
            .genre_replace(id, &fields)
            .await?
            .ok_or_else(|| not_found(EntityKind::Genre, id))?;
        tracing::info!("Updated genre {}", genre.id);
        Ok(Submission::Redirect(views::entity_url(EntityKind::Genre, genre.id)))
    }

    pub async fn delete_form(&self, id: Uuid) -> AppResult<Submission<GenreDelete>> {
        let (genre, books) = tokio::try_join!(
            self.store.genre_find(id),
            self.guard.dependents_of(Referenced::Genre(id))
        )?;
        let Some(genre) = genre else {
            return Ok(Submission::Redirect(views::list_url(EntityKind::Genre)));
        };

        Ok(Submission::Render(delete_page(genre.into(), books)))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<Submission<GenreDelete>> {
        match self.guard.delete(Referenced::Genre(id)).await {
            Ok(()) | Err(AppError::NotFound(_)) => {
                Ok(Submission::Redirect(views::list_url(EntityKind::Genre)))
            }
            Err(AppError::ConstraintViolation { dependents, .. }) => {
                match self.store.genre_find(id).await? {
                    Some(genre) => Ok(Submission::Rejected(delete_page(genre.into(), dependents))),
                    None => Ok(Submission::Redirect(views::list_url(EntityKind::Genre))),
                }
            }
            Err(e) => Err(e),
        }
    }
}
