//! Genre model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use unicode_normalization::UnicodeNormalization;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{self, FormInput, Violation};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
}

impl Genre {
    pub fn from_fields(id: Uuid, fields: GenreFields) -> Self {
        Self { id, name: fields.name }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenreFields {
    pub name: String,
}

/// Genre form submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct GenreInput {
    #[serde(default)]
    #[validate(length(min = 3, message = "Genre name must contain at least 3 characters"))]
    pub name: String,
}

impl FormInput for GenreInput {
    type Fields = GenreFields;

    const FIELDS: &'static [&'static str] = &["name"];

    fn trim(&mut self) {
        validation::trim_in_place(&mut self.name);
    }

    fn escape(&mut self) {
        validation::escape_in_place(&mut self.name);
    }

    fn to_fields(&self) -> Result<GenreFields, Violation> {
        Ok(GenreFields {
            name: self.name.clone(),
        })
    }
}

impl From<&Genre> for GenreInput {
    fn from(genre: &Genre) -> Self {
        Self {
            name: genre.name.clone(),
        }
    }
}

/// Comparison key for genre names: two names with equal keys are the same genre.
pub fn name_key(name: &str) -> String {
    name.nfc().flat_map(char::to_lowercase).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::sanitize;

    #[test]
    fn test_name_key_ignores_case() {
        assert_eq!(name_key("Fiction"), name_key("fICTION"));
        assert_ne!(name_key("Fiction"), name_key("Fictions"));
        // precomposed and combining forms fold to the same key
        assert_eq!(name_key("Poésie"), name_key("POE\u{301}SIE"));
    }

    #[test]
    fn test_short_names_rejected_after_trim() {
        let rejected = sanitize(GenreInput { name: "  ab  ".into() }).unwrap_err();
        assert_eq!(rejected.input.name, "ab");
        assert_eq!(
            rejected.violations,
            vec![Violation::new("name", "Genre name must contain at least 3 characters")]
        );
    }
}
