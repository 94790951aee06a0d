//! Lazily opened journal store.
//!
//! # Responsibility
//! - Remember where the journal database lives.
//! - Open it on first use and hand out the same connection afterwards.
//!
//! # Invariants
//! - At most one connection is opened per store.
//! - A failed open leaves the store unopened, so the next call retries.

use super::{open_db, open_db_in_memory, DbResult, DATABASE_NAME};
use once_cell::unsync::OnceCell;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Where a [`JournalStore`] keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    Memory,
}

impl StoreLocation {
    /// `journals.db` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::File(dir.as_ref().join(DATABASE_NAME))
    }
}

/// Owner of the journal table's connection.
pub struct JournalStore {
    location: StoreLocation,
    conn: OnceCell<Connection>,
}

impl JournalStore {
    pub fn new(location: StoreLocation) -> Self {
        Self {
            location,
            conn: OnceCell::new(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(StoreLocation::Memory)
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Returns the connection, opening it and creating the table on first call.
    pub fn open(&self) -> DbResult<&Connection> {
        self.conn.get_or_try_init(|| match &self.location {
            StoreLocation::File(path) => open_db(path),
            StoreLocation::Memory => open_db_in_memory(),
        })
    }

    pub fn is_open(&self) -> bool {
        self.conn.get().is_some()
    }
}
