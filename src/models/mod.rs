//! Data models for the catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Re-export commonly used types
pub use author::{Author, AuthorFields, AuthorInput};
pub use book::{Book, BookFields, BookInput};
pub use book_instance::{BookInstance, BookInstanceFields, BookInstanceInput, BookInstanceStatus};
pub use genre::{Genre, GenreFields, GenreInput};

/// The four record kinds held by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Author,
    Genre,
    Book,
    BookInstance,
}

impl EntityKind {
    /// Path segment used under `/catalog`
    pub fn plural(self) -> &'static str {
        match self {
            EntityKind::Author => "authors",
            EntityKind::Genre => "genres",
            EntityKind::Book => "books",
            EntityKind::BookInstance => "bookinstances",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EntityKind::Author => "Author",
            EntityKind::Genre => "Genre",
            EntityKind::Book => "Book",
            EntityKind::BookInstance => "BookInstance",
        };
        write!(f, "{}", label)
    }
}
