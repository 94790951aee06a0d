//! SQLite storage bootstrap for the journal table.
//!
//! # Responsibility
//! - Open and configure SQLite connections for `journals.db`.
//! - Create the `thoughts` table on first open and run the version hook.
//! - Own the single lazily opened connection behind [`JournalStore`].
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - No entry is read or written before the schema step succeeds.
//! - A journal file written by a newer binary is never modified.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;
mod store;

pub use open::{open_db, open_db_in_memory};
pub use store::{JournalStore, StoreLocation};

/// Default database file name.
pub const DATABASE_NAME: &str = "journals.db";

pub type DbResult<T> = Result<T, DbError>;

/// Storage-level failure of the journal database.
#[derive(Debug)]
pub enum DbError {
    /// The journal file could not be opened or created.
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
    /// Statement failure after the connection was opened.
    Sqlite(rusqlite::Error),
    /// The file carries a `user_version` this binary does not know.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    /// Stable code used in `error_code=` log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Open { .. } => "db_open_failed",
            Self::Sqlite(_) => "db_sqlite_failed",
            Self::UnsupportedSchemaVersion { .. } => "db_schema_unsupported",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "cannot open journal database {}: {source}", path.display())
            }
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "journal schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
