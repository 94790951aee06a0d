//! Public data contract for journal entries.
//!
//! # Responsibility
//! - Define the locator scheme, table and column names, and MIME type tags.
//! - Give callers typed column/field names instead of raw strings.
//!
//! # Invariants
//! - Collection locator is `content://<authority>/<collection-path>`.
//! - Item locator is the collection locator plus `/<id>`.
//! - Names here are persisted on disk; changing them needs a schema version bump.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Locator scheme shared by every journal locator.
pub const CONTENT_SCHEME: &str = "content";

/// Authority that owns all journal locators.
pub const CONTENT_AUTHORITY: &str = "com.feghas.jounalapp.data";

/// Path segment of the entries collection.
pub const PATH_THOUGHTS: &str = "thoughts";

/// Name of the single journal table.
pub const TABLE_NAME: &str = "thoughts";

/// MIME type of the entries collection.
pub const CONTENT_LIST_TYPE: &str = "vnd.android.cursor.dir/com.feghas.jounalapp.data/thoughts";

/// MIME type of a single entry.
pub const CONTENT_ITEM_TYPE: &str = "vnd.android.cursor.item/com.feghas.jounalapp.data/thoughts";

/// Readable column of the journal table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// Auto-assigned row id (`_id`).
    Id,
    Date,
    Message,
    Summary,
    Title,
}

impl Column {
    /// Every column in table declaration order.
    pub const ALL: [Column; 5] = [
        Column::Id,
        Column::Date,
        Column::Message,
        Column::Summary,
        Column::Title,
    ];

    /// Returns the SQL column name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "_id",
            Self::Date => "date",
            Self::Message => "message",
            Self::Summary => "summary",
            Self::Title => "title",
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Writable column of the journal table.
///
/// `_id` is deliberately absent: row ids are assigned on insert and never
/// change afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Date,
    Message,
    Summary,
    Title,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Date, Field::Message, Field::Summary, Field::Title];

    /// Returns the SQL column name.
    pub fn as_str(self) -> &'static str {
        self.column().as_str()
    }

    /// Returns the matching readable column.
    pub fn column(self) -> Column {
        match self {
            Self::Date => Column::Date,
            Self::Message => Column::Message,
            Self::Summary => Column::Summary,
            Self::Title => Column::Title,
        }
    }

    /// Whether the schema declares this field `NOT NULL`.
    pub fn is_required(self) -> bool {
        !matches!(self, Self::Message)
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of a routed locator, reported as a MIME type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Collection,
    Item,
}

impl ResourceKind {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Collection => CONTENT_LIST_TYPE,
            Self::Item => CONTENT_ITEM_TYPE,
        }
    }

    /// Short tag used by text interfaces.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Collection => "collection",
            Self::Item => "item",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime_type())
    }
}
