//! Book model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{self, FormInput, Violation};

/// Book as stored. `author` and `genre` are references resolved at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: Uuid,
    pub summary: String,
    pub isbn: String,
    pub genre: Vec<Uuid>,
}

impl Book {
    pub fn from_fields(id: Uuid, fields: BookFields) -> Self {
        Self {
            id,
            title: fields.title,
            author: fields.author,
            summary: fields.summary,
            isbn: fields.isbn,
            genre: fields.genre,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookFields {
    pub title: String,
    pub author: Uuid,
    pub summary: String,
    pub isbn: String,
    pub genre: Vec<Uuid>,
}

/// Book form submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title must not be empty."))]
    pub title: String,
    /// Author id
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Author must not be empty."),
        custom(function = "validation::reference_id")
    )]
    pub author: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Summary must not be empty."))]
    pub summary: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "ISBN must not be empty"))]
    pub isbn: String,
    /// Selected genre ids
    #[serde(default)]
    #[validate(custom(function = "validation::genre_ids"))]
    pub genre: Vec<String>,
}

impl BookInput {
    /// Whether the given genre is among the selected ones
    pub fn has_genre(&self, id: Uuid) -> bool {
        self.genre.iter().any(|g| validation::parse_id(g) == Some(id))
    }
}

impl FormInput for BookInput {
    type Fields = BookFields;

    const FIELDS: &'static [&'static str] = &["title", "author", "summary", "isbn", "genre"];

    fn trim(&mut self) {
        validation::trim_in_place(&mut self.title);
        validation::trim_in_place(&mut self.author);
        validation::trim_in_place(&mut self.summary);
        validation::trim_in_place(&mut self.isbn);
        for genre in &mut self.genre {
            validation::trim_in_place(genre);
        }
    }

    fn escape(&mut self) {
        validation::escape_in_place(&mut self.title);
        validation::escape_in_place(&mut self.author);
        validation::escape_in_place(&mut self.summary);
        validation::escape_in_place(&mut self.isbn);
        for genre in &mut self.genre {
            validation::escape_in_place(genre);
        }
    }

    fn to_fields(&self) -> Result<BookFields, Violation> {
        let author = validation::parse_id(&self.author)
            .ok_or_else(|| Violation::new("author", "Invalid reference."))?;
        let mut genre = Vec::with_capacity(self.genre.len());
        for raw in self.genre.iter().filter(|g| !g.is_empty()) {
            let id = validation::parse_id(raw).ok_or_else(|| Violation::new("genre", "Invalid genre."))?;
            if !genre.contains(&id) {
                genre.push(id);
            }
        }
        Ok(BookFields {
            title: self.title.clone(),
            author,
            summary: self.summary.clone(),
            isbn: self.isbn.clone(),
            genre,
        })
    }
}

impl From<&Book> for BookInput {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.to_string(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            genre: book.genre.iter().map(Uuid::to_string).collect(),
        }
    }
}
