//! Journal entry domain model.
//!
//! # Responsibility
//! - Define the canonical entry record and its integer identity.
//! - Provide the partial field set (`EntryValues`) used by write paths.
//! - Own the required-field rules enforced before any SQL mutation.
//!
//! # Invariants
//! - `id` is assigned by storage on insert and never rewritten.
//! - Stored rows always carry non-null `date`, `title` and `summary`.
//! - `EntryValues` distinguishes an absent field from a field set to null.

use crate::contract::Field;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Row id assigned by storage on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(i64);

impl EntryId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One stored journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: EntryId,
    /// Entry day, stored as `yyyy-MM-dd` by the editor.
    pub date: String,
    pub title: String,
    pub summary: String,
    /// Free-form body. May be null or empty.
    pub message: Option<String>,
}

/// Validation failure raised before a write reaches storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryValidationError {
    MissingRequiredField(Field),
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequiredField(field) => write!(f, "missing required field: {field}"),
        }
    }
}

impl Error for EntryValidationError {}

/// Partial set of entry fields for insert and update.
///
/// A field may be absent, present with text, or present with null.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryValues {
    fields: BTreeMap<Field, Option<String>>,
}

impl EntryValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`EntryValues::put`].
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.put(field, value);
        self
    }

    /// Builder form of [`EntryValues::put_null`].
    pub fn with_null(mut self, field: Field) -> Self {
        self.put_null(field);
        self
    }

    pub fn put(&mut self, field: Field, value: impl Into<String>) {
        self.fields.insert(field, Some(value.into()));
    }

    pub fn put_null(&mut self, field: Field) {
        self.fields.insert(field, None);
    }

    /// Sets the field to `value`, or to null when `value` is `None`.
    pub fn put_opt(&mut self, field: Field, value: Option<String>) {
        self.fields.insert(field, value);
    }

    /// Whether the field is present, including present-with-null.
    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains_key(&field)
    }

    /// Text value of a present, non-null field.
    pub fn value(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).and_then(|value| value.as_deref())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Present fields in column order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, Option<&str>)> + '_ {
        self.fields
            .iter()
            .map(|(field, value)| (*field, value.as_deref()))
    }

    /// Checks the fields an insert must carry.
    ///
    /// `date` and `title` are always checked; `summary` only when
    /// `require_summary` is set. Checks run in that order and the first
    /// failure wins.
    pub fn validate_for_insert(&self, require_summary: bool) -> Result<(), EntryValidationError> {
        let mut required = vec![Field::Date, Field::Title];
        if require_summary {
            required.push(Field::Summary);
        }
        for field in required {
            if self.value(field).is_none() {
                return Err(EntryValidationError::MissingRequiredField(field));
            }
        }
        Ok(())
    }

    /// Checks that every required field included in an update is non-null.
    ///
    /// Absent fields are fine; `message` is never checked.
    pub fn validate_for_update(&self) -> Result<(), EntryValidationError> {
        for field in Field::ALL.into_iter().filter(|field| field.is_required()) {
            if self.contains(field) && self.value(field).is_none() {
                return Err(EntryValidationError::MissingRequiredField(field));
            }
        }
        Ok(())
    }
}

/// Create request carrying every user-editable field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub date: String,
    pub title: String,
    pub summary: String,
    pub message: Option<String>,
}

impl NewEntry {
    pub fn new(
        date: impl Into<String>,
        title: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            title: title.into(),
            summary: summary.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn to_values(&self) -> EntryValues {
        let mut values = EntryValues::new()
            .with(Field::Date, self.date.as_str())
            .with(Field::Title, self.title.as_str())
            .with(Field::Summary, self.summary.as_str());
        values.put_opt(Field::Message, self.message.clone());
        values
    }
}

/// Editor form state: raw text of every input box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub date: String,
    pub title: String,
    pub summary: String,
    pub message: String,
}

impl EntryDraft {
    /// Whether every input box is empty.
    pub fn is_blank(&self) -> bool {
        [&self.date, &self.title, &self.summary, &self.message]
            .iter()
            .all(|value| value.is_empty())
    }

    /// Writes all four fields, empty text included.
    pub fn to_values(&self) -> EntryValues {
        EntryValues::new()
            .with(Field::Date, self.date.as_str())
            .with(Field::Message, self.message.as_str())
            .with(Field::Title, self.title.as_str())
            .with(Field::Summary, self.summary.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{EntryDraft, EntryValidationError, EntryValues, NewEntry};
    use crate::contract::Field;

    #[test]
    fn absent_and_null_fields_are_distinct() {
        let values = EntryValues::new()
            .with(Field::Title, "t")
            .with_null(Field::Message);

        assert!(values.contains(Field::Message));
        assert_eq!(values.value(Field::Message), None);
        assert!(!values.contains(Field::Date));
        assert_eq!(values.value(Field::Title), Some("t"));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn insert_checks_date_before_title() {
        let err = EntryValues::new().validate_for_insert(false).unwrap_err();
        assert_eq!(err, EntryValidationError::MissingRequiredField(Field::Date));

        let err = EntryValues::new()
            .with(Field::Date, "2024-01-01")
            .with_null(Field::Title)
            .validate_for_insert(false)
            .unwrap_err();
        assert_eq!(err, EntryValidationError::MissingRequiredField(Field::Title));
        assert_eq!(err.to_string(), "missing required field: title");
    }

    #[test]
    fn insert_summary_check_is_optional() {
        let values = EntryValues::new()
            .with(Field::Date, "2024-01-01")
            .with(Field::Title, "t");

        assert!(values.validate_for_insert(false).is_ok());
        assert_eq!(
            values.validate_for_insert(true),
            Err(EntryValidationError::MissingRequiredField(Field::Summary))
        );
    }

    #[test]
    fn update_only_checks_present_required_fields() {
        assert!(EntryValues::new().validate_for_update().is_ok());
        assert!(EntryValues::new()
            .with_null(Field::Message)
            .validate_for_update()
            .is_ok());
        assert_eq!(
            EntryValues::new()
                .with_null(Field::Summary)
                .validate_for_update(),
            Err(EntryValidationError::MissingRequiredField(Field::Summary))
        );
    }

    #[test]
    fn empty_strings_are_not_null() {
        let values = NewEntry::new("", "", "").to_values();
        assert!(values.validate_for_insert(true).is_ok());
        assert_eq!(values.value(Field::Message), None);
        assert!(values.contains(Field::Message));
    }

    #[test]
    fn draft_blankness_covers_every_box() {
        assert!(EntryDraft::default().is_blank());
        let draft = EntryDraft {
            message: "x".to_string(),
            ..EntryDraft::default()
        };
        assert!(!draft.is_blank());
        assert_eq!(draft.to_values().len(), 4);
    }
}
