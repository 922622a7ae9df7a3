//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{self, FormInput, Violation};

/// Author as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    pub fn from_fields(id: Uuid, fields: AuthorFields) -> Self {
        Self {
            id,
            first_name: fields.first_name,
            family_name: fields.family_name,
            date_of_birth: fields.date_of_birth,
            date_of_death: fields.date_of_death,
        }
    }
}

/// Author fields written by create and update
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorFields {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Author form submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct AuthorInput {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "First name must be specified."),
        custom(function = "validation::first_name_max")
    )]
    pub first_name: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Family name must be specified."),
        custom(function = "validation::family_name_max")
    )]
    pub family_name: String,
    /// `YYYY-MM-DD`, empty when unknown
    #[serde(default)]
    #[validate(custom(function = "validation::date_of_birth"))]
    pub date_of_birth: String,
    #[serde(default)]
    #[validate(custom(function = "validation::date_of_death"))]
    pub date_of_death: String,
}

impl FormInput for AuthorInput {
    type Fields = AuthorFields;

    const FIELDS: &'static [&'static str] =
        &["first_name", "family_name", "date_of_birth", "date_of_death"];

    fn trim(&mut self) {
        validation::trim_in_place(&mut self.first_name);
        validation::trim_in_place(&mut self.family_name);
        validation::trim_in_place(&mut self.date_of_birth);
        validation::trim_in_place(&mut self.date_of_death);
    }

    fn escape(&mut self) {
        validation::escape_in_place(&mut self.first_name);
        validation::escape_in_place(&mut self.family_name);
    }

    fn to_fields(&self) -> Result<AuthorFields, Violation> {
        let date_of_birth = validation::parse_optional_date(&self.date_of_birth)
            .map_err(|_| Violation::new("date_of_birth", "Invalid date of birth"))?;
        let date_of_death = validation::parse_optional_date(&self.date_of_death)
            .map_err(|_| Violation::new("date_of_death", "Invalid date of death"))?;
        Ok(AuthorFields {
            first_name: self.first_name.clone(),
            family_name: self.family_name.clone(),
            date_of_birth,
            date_of_death,
        })
    }
}

/// Pre-fill the update form from a stored author
impl From<&Author> for AuthorInput {
    fn from(author: &Author) -> Self {
        Self {
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            date_of_birth: iso_date(author.date_of_birth),
            date_of_death: iso_date(author.date_of_death),
        }
    }
}

pub(crate) fn iso_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::sanitize;

    #[test]
    fn test_all_violations_reported() {
        let input = AuthorInput {
            first_name: "   ".into(),
            family_name: "x".repeat(101),
            date_of_birth: "yesterday".into(),
            date_of_death: "".into(),
        };
        let rejected = sanitize(input).unwrap_err();
        let fields: Vec<&str> = rejected.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["first_name", "family_name", "date_of_birth"]);
        assert_eq!(rejected.input.first_name, "");
        assert_eq!(rejected.input.date_of_birth, "yesterday");
    }

    #[test]
    fn test_accepted_author_is_trimmed_and_escaped() {
        let input = AuthorInput {
            first_name: " Isaac ".into(),
            family_name: "<Asimov>".into(),
            date_of_birth: "1920-01-02".into(),
            date_of_death: "".into(),
        };
        let (_, fields) = sanitize(input).unwrap();
        assert_eq!(fields.first_name, "Isaac");
        assert_eq!(fields.family_name, "&lt;Asimov&gt;");
        assert_eq!(fields.date_of_birth, NaiveDate::from_ymd_opt(1920, 1, 2));
        assert_eq!(fields.date_of_death, None);
    }

    #[test]
    fn test_name_length_counts_characters() {
        let input = AuthorInput {
            first_name: "é".repeat(100),
            family_name: "Ng".into(),
            ..Default::default()
        };
        assert!(sanitize(input).is_ok());
    }
}
