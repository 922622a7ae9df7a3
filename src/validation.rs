//! Validation pipeline for submitted catalog forms
//!
//! Every form goes through the same three stages: whitespace trimming, rule
//! evaluation (all rules on all fields, no short-circuit) and markup escaping
//! of free text. Rejected submissions keep their sanitized values so the form
//! can be shown again exactly as the user typed it.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// Maximum length of an author's first or family name
pub const NAME_MAX_CHARS: usize = 100;

/// A single failed rule on a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A raw form submission that can be sanitized and turned into stored fields
pub trait FormInput: Validate {
    /// Values persisted when the submission is accepted
    type Fields;

    /// Declared field order, used to order reported violations
    const FIELDS: &'static [&'static str];

    /// Trim surrounding whitespace from every text field
    fn trim(&mut self);

    /// Escape markup-significant characters in free-text fields
    fn escape(&mut self);

    /// Convert the sanitized values into typed fields.
    fn to_fields(&self) -> Result<Self::Fields, Violation>;
}

/// A submission that failed at least one rule
#[derive(Debug, Clone)]
pub struct Rejected<F> {
    /// Sanitized input, ready to be shown again
    pub input: F,
    pub violations: Vec<Violation>,
}

impl<F> Rejected<F> {
    pub fn single(input: F, violation: Violation) -> Self {
        Self {
            input,
            violations: vec![violation],
        }
    }
}

/// Run the full pipeline over a submission.
///
/// On success returns the sanitized input together with its typed fields.
pub fn sanitize<F: FormInput>(mut input: F) -> Result<(F, F::Fields), Rejected<F>> {
    input.trim();

    let violations = match input.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => ordered_violations(&errors, F::FIELDS),
    };

    input.escape();

    if !violations.is_empty() {
        return Err(Rejected { input, violations });
    }

    match input.to_fields() {
        Ok(fields) => Ok((input, fields)),
        Err(violation) => Err(Rejected::single(input, violation)),
    }
}

fn ordered_violations(errors: &ValidationErrors, order: &[&str]) -> Vec<Violation> {
    let mut ranked: Vec<(usize, Violation)> = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        let name: &str = &field;
        let rank = order.iter().position(|f| *f == name).unwrap_or(order.len());
        for error in field_errors.iter() {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string());
            ranked.push((rank, Violation::new(name, message)));
        }
    }

    ranked.sort_by_key(|(rank, _)| *rank);
    ranked.into_iter().map(|(_, v)| v).collect()
}

// ---------------------------------------------------------------------------
// Sanitizers
// ---------------------------------------------------------------------------

pub fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Replace characters a markup renderer would interpret with their entities.
pub fn escape_markup(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '/' => escaped.push_str("&#x2F;"),
            '\\' => escaped.push_str("&#x5C;"),
            '`' => escaped.push_str("&#96;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn escape_in_place(value: &mut String) {
    if value.contains(&['&', '"', '\'', '<', '>', '/', '\\', '`'][..]) {
        *value = escape_markup(value);
    }
}

/// Parse an ISO 8601 calendar date or date-time, keeping the date part.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// A filled-in date field that is not an ISO 8601 date
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date: {0}")]
pub struct InvalidDate(pub String);

/// Parse an optional date field: empty means absent.
pub fn parse_optional_date(value: &str) -> Result<Option<NaiveDate>, InvalidDate> {
    if value.is_empty() {
        return Ok(None);
    }
    parse_date(value)
        .map(Some)
        .ok_or_else(|| InvalidDate(value.to_string()))
}

pub fn parse_id(value: &str) -> Option<Uuid> {
    Uuid::parse_str(value).ok()
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

fn violation(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn optional_date(value: &str, message: &'static str) -> Result<(), ValidationError> {
    parse_optional_date(value)
        .map(|_| ())
        .map_err(|_| violation("date", message))
}

pub fn first_name_max(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > NAME_MAX_CHARS {
        return Err(violation("length", "First name must be at most 100 characters."));
    }
    Ok(())
}

pub fn family_name_max(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > NAME_MAX_CHARS {
        return Err(violation("length", "Family name must be at most 100 characters."));
    }
    Ok(())
}

pub fn date_of_birth(value: &str) -> Result<(), ValidationError> {
    optional_date(value, "Invalid date of birth")
}

pub fn date_of_death(value: &str) -> Result<(), ValidationError> {
    optional_date(value, "Invalid date of death")
}

pub fn due_back(value: &str) -> Result<(), ValidationError> {
    optional_date(value, "Invalid date")
}

/// A reference field that is filled in must hold a well-formed id.
/// Emptiness is reported by the field's `length` rule.
pub fn reference_id(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || parse_id(value).is_some() {
        return Ok(());
    }
    Err(violation("reference", "Invalid reference."))
}

/// Every selected genre must be a well-formed id. Existence is not checked.
pub fn genre_ids(values: &[String]) -> Result<(), ValidationError> {
    if values.iter().all(|v| v.is_empty() || parse_id(v).is_some()) {
        return Ok(());
    }
    Err(violation("reference", "Invalid genre."))
}

pub fn instance_status(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.parse::<crate::models::BookInstanceStatus>().is_ok() {
        return Ok(());
    }
    Err(violation("status", "Invalid status"))
}
