//! Persistence core for the journal app.
//! Locator-routed CRUD over a single SQLite table of journal entries.

pub mod contract;
pub mod db;
pub mod locator;
pub mod logging;
pub mod model;
pub mod provider;
pub mod service;

pub use contract::{Column, Field, ResourceKind};
pub use db::{DbError, DbResult, JournalStore, StoreLocation};
pub use locator::Locator;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::entry::{
    EntryDraft, EntryId, EntryValidationError, EntryValues, JournalEntry, NewEntry,
};
pub use provider::{
    ChangeObserver, EntryAccess, EntryQuery, JournalProvider, ObserverHandle, ObserverRegistry,
    Operation, OrderBy, ProviderError, ProviderOptions, ProviderResult, RowSet, Selection,
};
pub use service::entry_service::{display_date, EntryService, SaveOutcome};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
