//! Presentation data assembled from stored records
//!
//! Everything here is pure: urls, formatted dates and composite author
//! fields are recomputed from stored fields on every read and never persisted.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Author, Book, BookInstance, EntityKind, Genre};

/// Canonical detail path of an entity
pub fn entity_url(kind: EntityKind, id: Uuid) -> String {
    format!("/catalog/{}/{}", kind.plural(), id)
}

/// Path of the list of all entities of a kind
pub fn list_url(kind: EntityKind) -> String {
    format!("/catalog/{}", kind.plural())
}

/// Medium-length date, e.g. `Oct 19, 2026`; empty when absent
pub fn format_date_med(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

/// `"family_name, first_name"`, or empty when either part is missing
pub fn author_name(first_name: &str, family_name: &str) -> String {
    if first_name.is_empty() || family_name.is_empty() {
        return String::new();
    }
    format!("{}, {}", family_name, first_name)
}

pub fn author_lifespan(date_of_birth: Option<NaiveDate>, date_of_death: Option<NaiveDate>) -> String {
    if date_of_birth.is_none() && date_of_death.is_none() {
        return "N/A".to_string();
    }
    format!(
        "{} - {}",
        format_date_med(date_of_birth),
        format_date_med(date_of_death)
    )
}

// ---------------------------------------------------------------------------
// View records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorView {
    #[serde(flatten)]
    pub author: Author,
    pub name: String,
    pub url: String,
    pub date_of_birth_formatted: String,
    pub date_of_death_formatted: String,
    pub lifespan: String,
}

impl From<Author> for AuthorView {
    fn from(author: Author) -> Self {
        Self {
            name: author_name(&author.first_name, &author.family_name),
            url: entity_url(EntityKind::Author, author.id),
            date_of_birth_formatted: format_date_med(author.date_of_birth),
            date_of_death_formatted: format_date_med(author.date_of_death),
            lifespan: author_lifespan(author.date_of_birth, author.date_of_death),
            author,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreView {
    #[serde(flatten)]
    pub genre: Genre,
    pub url: String,
}

impl From<Genre> for GenreView {
    fn from(genre: Genre) -> Self {
        Self {
            url: entity_url(EntityKind::Genre, genre.id),
            genre,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookView {
    #[serde(flatten)]
    pub book: Book,
    pub url: String,
}

impl From<Book> for BookView {
    fn from(book: Book) -> Self {
        Self {
            url: entity_url(EntityKind::Book, book.id),
            book,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookInstanceView {
    #[serde(flatten)]
    pub instance: BookInstance,
    pub url: String,
    pub due_back_formatted: String,
}

impl From<BookInstance> for BookInstanceView {
    fn from(instance: BookInstance) -> Self {
        Self {
            url: entity_url(EntityKind::BookInstance, instance.id),
            due_back_formatted: format_date_med(instance.due_back),
            instance,
        }
    }
}

/// Convert a list of records into their views
pub fn all<T, V: From<T>>(records: Vec<T>) -> Vec<V> {
    records.into_iter().map(V::from).collect()
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// A named view plus the data mapping handed to the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub view: &'static str,
    pub title: String,
    #[serde(flatten)]
    pub data: T,
}

impl<T> Page<T> {
    pub fn new(view: &'static str, title: impl Into<String>, data: T) -> Self {
        Self {
            view,
            title: title.into(),
            data,
        }
    }
}

/// Result of a form GET or submit
#[derive(Debug, Clone)]
pub enum Submission<T> {
    /// Show the page
    Render(Page<T>),
    /// Show the page again because the submission was refused
    Rejected(Page<T>),
    /// Continue at another path
    Redirect(String),
}

impl<T> Submission<T> {
    pub fn redirect_url(&self) -> Option<&str> {
        match self {
            Submission::Redirect(url) => Some(url),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_urls() {
        let id = Uuid::nil();
        assert_eq!(
            entity_url(EntityKind::BookInstance, id),
            "/catalog/bookinstances/00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(list_url(EntityKind::Genre), "/catalog/genres");
    }

    #[test]
    fn test_author_name_needs_both_parts() {
        assert_eq!(author_name("Jane", "Austen"), "Austen, Jane");
        assert_eq!(author_name("", "Austen"), "");
        assert_eq!(author_name("Jane", ""), "");
    }

    #[test]
    fn test_lifespan() {
        assert_eq!(author_lifespan(None, None), "N/A");
        assert_eq!(author_lifespan(date(1775, 12, 16), date(1817, 7, 18)), "Dec 16, 1775 - Jul 18, 1817");
        assert_eq!(author_lifespan(date(1948, 9, 20), None), "Sep 20, 1948 - ");
        assert_eq!(author_lifespan(None, date(1817, 7, 18)), " - Jul 18, 1817");
    }

    #[test]
    fn test_author_view() {
        let author = Author {
            id: Uuid::new_v4(),
            first_name: "Isaac".into(),
            family_name: "Asimov".into(),
            date_of_birth: date(1920, 1, 2),
            date_of_death: date(1992, 4, 6),
        };
        let view = AuthorView::from(author.clone());
        assert_eq!(view.name, "Asimov, Isaac");
        assert_eq!(view.date_of_birth_formatted, "Jan 2, 1920");
        assert_eq!(view.url, format!("/catalog/authors/{}", author.id));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["family_name"], "Asimov");
        assert_eq!(json["lifespan"], "Jan 2, 1920 - Apr 6, 1992");
    }

    #[test]
    fn test_missing_due_back_formats_empty() {
        assert_eq!(format_date_med(None), "");
    }
}
