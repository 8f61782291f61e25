//! Record domain model.
//!
//! # Responsibility
//! - Define the canonical record entity managed by the store.
//! - Validate client-provided fields before they reach persistence.
//!
//! # Invariants
//! - `id` is stable and never reused for another record.
//! - `title` is never blank after validation.
//! - `start` is a calendar date with a four-digit year, so its ISO text form
//!   sorts chronologically.
//! - `created_at` is immutable after insertion.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier assigned by the store on creation.
pub type RecordId = Uuid;

/// Wire and storage format for `start`.
pub const START_DATE_FORMAT: &str = "%Y-%m-%d";

/// Persisted record as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Serialized as `_id` to match the document-store shape clients expect.
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub title: String,
    #[serde(with = "start_date")]
    pub start: NaiveDate,
    pub description: String,
    #[serde(with = "millis_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "millis_timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Validated editable fields. Create and full-replacement update share this shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFields {
    pub title: String,
    pub start: NaiveDate,
    pub description: String,
}

/// Raw client payload for create/update before validation.
///
/// Every field is optional so that missing values surface as
/// [`RecordValidationError`] instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecordInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Field-level validation failure for record input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    MissingTitle,
    MissingStart,
    InvalidStart(String),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTitle => write!(f, "title is required"),
            Self::MissingStart => write!(f, "start is required"),
            Self::InvalidStart(value) => {
                write!(f, "start `{value}` is not a YYYY-MM-DD calendar date")
            }
        }
    }
}

impl Error for RecordValidationError {}

impl RecordFields {
    /// Builds fields from already-typed values, checking the same rules as
    /// [`RecordInput::validate`].
    pub fn new(
        title: impl Into<String>,
        start: NaiveDate,
        description: impl Into<String>,
    ) -> Result<Self, RecordValidationError> {
        let fields = Self {
            title: title.into(),
            start,
            description: description.into(),
        };
        fields.validate()?;
        Ok(fields)
    }

    /// Checks field invariants enforced before every write.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.title.trim().is_empty() {
            return Err(RecordValidationError::MissingTitle);
        }
        if !(1..=9999).contains(&self.start.year()) {
            return Err(RecordValidationError::InvalidStart(
                self.start.format(START_DATE_FORMAT).to_string(),
            ));
        }
        Ok(())
    }
}

impl RecordInput {
    /// Converts raw input into validated fields.
    ///
    /// - `title` is trimmed and must be non-empty.
    /// - `start` must parse as `YYYY-MM-DD`.
    /// - missing `description` becomes an empty string.
    pub fn validate(&self) -> Result<RecordFields, RecordValidationError> {
        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(RecordValidationError::MissingTitle)?;

        let start_text = self
            .start
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(RecordValidationError::MissingStart)?;
        let start = parse_start_date(start_text)?;

        RecordFields::new(title, start, self.description.clone().unwrap_or_default())
    }
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_start_date(value: &str) -> Result<NaiveDate, RecordValidationError> {
    let parsed = NaiveDate::parse_from_str(value, START_DATE_FORMAT)
        .map_err(|_| RecordValidationError::InvalidStart(value.to_string()))?;
    if !(1..=9999).contains(&parsed.year()) {
        return Err(RecordValidationError::InvalidStart(value.to_string()));
    }
    Ok(parsed)
}

mod start_date {
    use super::START_DATE_FORMAT;
    use chrono::NaiveDate;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(START_DATE_FORMAT))
    }
}

mod millis_timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::Serializer;

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}
