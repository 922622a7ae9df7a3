//! Book instance (physical copy) model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{self, FormInput, Violation};

/// Circulation status of a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum BookInstanceStatus {
    Available,
    #[default]
    Maintenance,
    #[serde(alias = "Loaned")]
    LoanedOut,
    Reserved,
}

impl BookInstanceStatus {
    pub const ALL: [BookInstanceStatus; 4] = [
        BookInstanceStatus::Available,
        BookInstanceStatus::Maintenance,
        BookInstanceStatus::LoanedOut,
        BookInstanceStatus::Reserved,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BookInstanceStatus::Available => "Available",
            BookInstanceStatus::Maintenance => "Maintenance",
            BookInstanceStatus::LoanedOut => "LoanedOut",
            BookInstanceStatus::Reserved => "Reserved",
        }
    }
}

impl std::fmt::Display for BookInstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BookInstanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(BookInstanceStatus::Available),
            "Maintenance" => Ok(BookInstanceStatus::Maintenance),
            "LoanedOut" | "Loaned" => Ok(BookInstanceStatus::LoanedOut),
            "Reserved" => Ok(BookInstanceStatus::Reserved),
            other => Err(format!("unknown book instance status: {}", other)),
        }
    }
}

impl TryFrom<String> for BookInstanceStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Copy as stored. `book` is a reference resolved at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    pub book: Uuid,
    pub imprint: String,
    #[sqlx(try_from = "String")]
    pub status: BookInstanceStatus,
    pub due_back: Option<NaiveDate>,
}

impl BookInstance {
    pub fn from_fields(id: Uuid, fields: BookInstanceFields) -> Self {
        Self {
            id,
            book: fields.book,
            imprint: fields.imprint,
            status: fields.status,
            due_back: fields.due_back,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookInstanceFields {
    pub book: Uuid,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: Option<NaiveDate>,
}

/// Book instance form submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookInstanceInput {
    /// Book id
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Book must be specified"),
        custom(function = "validation::reference_id")
    )]
    pub book: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Imprint must be specified"))]
    pub imprint: String,
    /// Empty defaults to `Maintenance`
    #[serde(default)]
    #[validate(custom(function = "validation::instance_status"))]
    pub status: String,
    #[serde(default)]
    #[validate(custom(function = "validation::due_back"))]
    pub due_back: String,
}

impl FormInput for BookInstanceInput {
    type Fields = BookInstanceFields;

    const FIELDS: &'static [&'static str] = &["book", "imprint", "status", "due_back"];

    fn trim(&mut self) {
        validation::trim_in_place(&mut self.book);
        validation::trim_in_place(&mut self.imprint);
        validation::trim_in_place(&mut self.status);
        validation::trim_in_place(&mut self.due_back);
    }

    fn escape(&mut self) {
        validation::escape_in_place(&mut self.book);
        validation::escape_in_place(&mut self.imprint);
        validation::escape_in_place(&mut self.status);
    }

    fn to_fields(&self) -> Result<BookInstanceFields, Violation> {
        let book = validation::parse_id(&self.book)
            .ok_or_else(|| Violation::new("book", "Invalid reference."))?;
        let status = if self.status.is_empty() {
            BookInstanceStatus::default()
        } else {
            self.status
                .parse()
                .map_err(|_| Violation::new("status", "Invalid status"))?
        };
        let due_back = validation::parse_optional_date(&self.due_back)
            .map_err(|_| Violation::new("due_back", "Invalid date"))?;
        Ok(BookInstanceFields {
            book,
            imprint: self.imprint.clone(),
            status,
            due_back,
        })
    }
}

impl From<&BookInstance> for BookInstanceInput {
    fn from(instance: &BookInstance) -> Self {
        Self {
            book: instance.book.to_string(),
            imprint: instance.imprint.clone(),
            status: instance.status.to_string(),
            due_back: super::author::iso_date(instance.due_back),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::sanitize;

    fn input(status: &str, due_back: &str) -> BookInstanceInput {
        BookInstanceInput {
            book: Uuid::new_v4().to_string(),
            imprint: "Gollancz, 2011.".into(),
            status: status.into(),
            due_back: due_back.into(),
        }
    }

    #[test]
    fn test_empty_due_back_is_absent() {
        let (_, fields) = sanitize(input("Available", "")).unwrap();
        assert_eq!(fields.status, BookInstanceStatus::Available);
        assert_eq!(fields.due_back, None);
    }

    #[test]
    fn test_empty_status_defaults_to_maintenance() {
        let (_, fields) = sanitize(input("", "2024-05-01")).unwrap();
        assert_eq!(fields.status, BookInstanceStatus::Maintenance);
        assert_eq!(fields.due_back, NaiveDate::from_ymd_opt(2024, 5, 1));
    }

    #[test]
    fn test_unknown_status_and_bad_date() {
        let rejected = sanitize(input("Lost", "soon")).unwrap_err();
        assert_eq!(
            rejected.violations,
            vec![
                Violation::new("status", "Invalid status"),
                Violation::new("due_back", "Invalid date"),
            ]
        );
    }

    #[test]
    fn test_status_names() {
        assert_eq!("Loaned".parse::<BookInstanceStatus>(), Ok(BookInstanceStatus::LoanedOut));
        assert_eq!(BookInstanceStatus::LoanedOut.to_string(), "LoanedOut");
        assert_eq!(
            serde_json::to_string(&BookInstanceStatus::LoanedOut).unwrap(),
            "\"LoanedOut\""
        );
        assert_eq!(
            serde_json::from_str::<BookInstanceStatus>("\"Loaned\"").unwrap(),
            BookInstanceStatus::LoanedOut
        );
        assert_eq!(
            BookInstanceStatus::try_from("LoanedOut".to_string()),
            Ok(BookInstanceStatus::LoanedOut)
        );
    }

    #[test]
    fn test_loaned_alias_is_stored_as_loaned_out() {
        let input = BookInstanceInput {
            book: Uuid::new_v4().to_string(),
            imprint: "Gollancz".into(),
            status: "Loaned".into(),
            due_back: "2024-06-30".into(),
        };
        let (_, fields) = sanitize(input).unwrap();
        assert_eq!(fields.status, BookInstanceStatus::LoanedOut);
        assert_eq!(fields.status.as_str(), "LoanedOut");
    }
}
