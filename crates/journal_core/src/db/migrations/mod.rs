//! Journal schema creation and version hook.
//!
//! # Responsibility
//! - Create the journal table on a fresh database.
//! - Call the upgrade hook when an older schema version is found.
//!
//! # Invariants
//! - Applied version is mirrored to `PRAGMA user_version`.
//! - Creation and version bump commit in one transaction.
//! - The schema has a single version, so the upgrade hook changes nothing.

use crate::contract::{Column, TABLE_NAME};
use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

/// Schema version written by this binary.
pub const DATABASE_VERSION: u32 = 1;

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    DATABASE_VERSION
}

/// Returns the `CREATE TABLE` statement for the journal table.
pub fn create_table_sql() -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {TABLE_NAME} (
            {} INTEGER PRIMARY KEY AUTOINCREMENT,
            {} TEXT NOT NULL,
            {} TEXT,
            {} TEXT NOT NULL,
            {} TEXT NOT NULL
        );",
        Column::Id,
        Column::Date,
        Column::Message,
        Column::Summary,
        Column::Title,
    )
}

/// Brings the connection's schema to [`DATABASE_VERSION`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer binary.
/// - `Sqlite` when table creation or the version bump fails.
pub fn apply_schema(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    if current_version == 0 {
        on_create(&tx)?;
    } else {
        upgrade(&tx, current_version, latest)?;
    }
    tx.execute_batch(&format!("PRAGMA user_version = {latest};"))?;
    tx.commit()?;

    Ok(())
}

/// Creates the journal table.
pub fn on_create(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(&create_table_sql())?;
    info!("event=schema_create module=db status=ok version={DATABASE_VERSION}");
    Ok(())
}

/// Migration hook between schema versions.
///
/// The journal table has only ever had version 1, so there is nothing to
/// migrate yet.
pub fn upgrade(_conn: &Connection, old_version: u32, new_version: u32) -> DbResult<()> {
    debug!(
        "event=schema_upgrade module=db status=ok old_version={old_version} new_version={new_version}"
    );
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
