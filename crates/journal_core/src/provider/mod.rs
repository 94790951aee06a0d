//! Locator-routed access to journal entries.
//!
//! # Responsibility
//! - Route locators to the collection or a single entry.
//! - Validate writes, run CRUD against the store, notify observers.
//! - Report every failure through one [`ProviderError`] type.
//!
//! # Invariants
//! - Item locators always force the filter to their embedded id.
//! - Change notification only follows a write that touched at least one row.
//! - Validation failures never reach storage.

use crate::contract::{Field, ResourceKind};
use crate::db::DbError;
use crate::locator::Locator;
use crate::model::entry::{EntryValidationError, EntryValues};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod journal_provider;
pub mod matcher;
pub mod observer;
pub mod row_set;

pub use journal_provider::{JournalProvider, ProviderOptions};
pub use matcher::{ResolvedLocator, RouteTable};
pub use observer::{ChangeObserver, ObserverHandle, ObserverRegistry};
pub use row_set::{EntryQuery, OrderBy, RowRef, RowSet, Selection};

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Provider operation, carried by routing errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Query,
    Insert,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum ProviderError {
    /// The locator matches no route for this operation.
    UnsupportedResource {
        operation: Operation,
        locator: Locator,
    },
    /// A required field was absent or null.
    MissingRequiredField(Field),
    /// Storage rejected an insert.
    WriteFailed { locator: Locator, source: DbError },
    /// Resource type was asked for a locator that matches no route.
    InternalInconsistency { locator: Locator },
    /// A stored row could not be read back as an entry.
    InvalidRow(String),
    Storage(DbError),
}

impl ProviderError {
    /// Stable machine-readable code for logs and text interfaces.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedResource { .. } => "unsupported_resource",
            Self::MissingRequiredField(_) => "missing_required_field",
            Self::WriteFailed { .. } => "write_failed",
            Self::InternalInconsistency { .. } => "internal_inconsistency",
            Self::InvalidRow(_) => "invalid_row",
            Self::Storage(_) => "storage",
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedResource { operation, locator } => {
                write!(f, "unsupported resource for {operation}: {locator}")
            }
            Self::MissingRequiredField(field) => write!(f, "missing required field: {field}"),
            Self::WriteFailed { locator, source } => {
                write!(f, "failed to insert row for {locator}: {source}")
            }
            Self::InternalInconsistency { locator } => {
                write!(f, "unknown locator {locator}: no route matched")
            }
            Self::InvalidRow(message) => write!(f, "invalid stored row: {message}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProviderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::WriteFailed { source, .. } => Some(source),
            Self::Storage(err) => Some(err),
            Self::UnsupportedResource { .. }
            | Self::MissingRequiredField(_)
            | Self::InternalInconsistency { .. }
            | Self::InvalidRow(_) => None,
        }
    }
}

impl From<EntryValidationError> for ProviderError {
    fn from(value: EntryValidationError) -> Self {
        match value {
            EntryValidationError::MissingRequiredField(field) => Self::MissingRequiredField(field),
        }
    }
}

impl From<DbError> for ProviderError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

impl From<rusqlite::Error> for ProviderError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(DbError::Sqlite(value))
    }
}

/// Locator-level CRUD contract consumed by services and presentation code.
pub trait EntryAccess {
    fn query(&self, locator: &Locator, query: &EntryQuery) -> ProviderResult<RowSet>;
    fn insert(&self, locator: &Locator, values: &EntryValues) -> ProviderResult<Locator>;
    fn update(
        &self,
        locator: &Locator,
        values: &EntryValues,
        selection: &Selection,
    ) -> ProviderResult<usize>;
    fn delete(&self, locator: &Locator, selection: &Selection) -> ProviderResult<usize>;
    fn resource_type(&self, locator: &Locator) -> ProviderResult<ResourceKind>;
}

impl<T: EntryAccess + ?Sized> EntryAccess for &T {
    fn query(&self, locator: &Locator, query: &EntryQuery) -> ProviderResult<RowSet> {
        (**self).query(locator, query)
    }

    fn insert(&self, locator: &Locator, values: &EntryValues) -> ProviderResult<Locator> {
        (**self).insert(locator, values)
    }

    fn update(
        &self,
        locator: &Locator,
        values: &EntryValues,
        selection: &Selection,
    ) -> ProviderResult<usize> {
        (**self).update(locator, values, selection)
    }

    fn delete(&self, locator: &Locator, selection: &Selection) -> ProviderResult<usize> {
        (**self).delete(locator, selection)
    }

    fn resource_type(&self, locator: &Locator) -> ProviderResult<ResourceKind> {
        (**self).resource_type(locator)
    }
}
