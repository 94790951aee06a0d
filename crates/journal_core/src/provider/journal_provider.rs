//! SQLite-backed journal provider.
//!
//! # Responsibility
//! - Own the store, the route table and the observer registry.
//! - Implement [`EntryAccess`] over the `thoughts` table.
//!
//! # Invariants
//! - Routing runs before validation; validation runs before storage is opened.
//! - Item locators replace any caller filter with `_id = <id>`.
//! - Notification goes to the locator the caller used, after the write.

use crate::contract::{ResourceKind, TABLE_NAME};
use crate::db::{DbError, JournalStore};
use crate::locator::Locator;
use crate::model::entry::{EntryId, EntryValues};
use crate::provider::matcher::{ResolvedLocator, RouteTable};
use crate::provider::observer::ObserverRegistry;
use crate::provider::row_set::{EntryQuery, RowSet, Selection};
use crate::provider::{EntryAccess, Operation, ProviderError, ProviderResult};
use log::{debug, error, info, warn};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::sync::Arc;

/// Behaviour switches for [`JournalProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderOptions {
    /// Reject inserts without a non-null `summary` before they reach SQLite.
    ///
    /// When `false`, only `date` and `title` are checked up front and a
    /// missing summary surfaces as `WriteFailed` from the `NOT NULL`
    /// constraint.
    pub validate_summary_on_insert: bool,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            validate_summary_on_insert: true,
        }
    }
}

/// Locator-routed CRUD over the journal table.
pub struct JournalProvider {
    store: JournalStore,
    routes: RouteTable,
    observers: Arc<ObserverRegistry>,
    options: ProviderOptions,
}

impl JournalProvider {
    pub fn new(store: JournalStore) -> Self {
        Self::with_options(store, ProviderOptions::default())
    }

    pub fn with_options(store: JournalStore, options: ProviderOptions) -> Self {
        Self {
            store,
            routes: RouteTable::journal(),
            observers: Arc::new(ObserverRegistry::new()),
            options,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(JournalStore::in_memory())
    }

    /// Registry that receives this provider's change notifications.
    pub fn observers(&self) -> &Arc<ObserverRegistry> {
        &self.observers
    }

    pub fn store(&self) -> &JournalStore {
        &self.store
    }

    pub fn resolve(&self, locator: &Locator) -> Option<ResolvedLocator> {
        self.routes.resolve(locator)
    }

    fn route(&self, operation: Operation, locator: &Locator) -> ProviderResult<ResolvedLocator> {
        self.routes.resolve(locator).ok_or_else(|| {
            warn!(
                "event=entry_{operation} module=provider status=error error_code=unsupported_resource locator={locator}"
            );
            ProviderError::UnsupportedResource {
                operation,
                locator: locator.clone(),
            }
        })
    }

    fn connection(&self) -> ProviderResult<&Connection> {
        Ok(self.store.open()?)
    }
}

impl EntryAccess for JournalProvider {
    fn query(&self, locator: &Locator, query: &EntryQuery) -> ProviderResult<RowSet> {
        let resolved = self.route(Operation::Query, locator)?;
        let selection = effective_selection(resolved, &query.selection);
        let columns = query.resolved_columns();
        let projection: Vec<&str> = columns.iter().map(|column| column.as_str()).collect();
        let sql = format!(
            "SELECT {} FROM {TABLE_NAME}{}{};",
            projection.join(", "),
            selection.where_sql(),
            query.order_sql()
        );

        let conn = self.connection()?;
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(selection.args()))?;
        let mut values = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Vec::with_capacity(columns.len());
            for index in 0..columns.len() {
                record.push(row.get::<_, Value>(index)?);
            }
            values.push(record);
        }

        debug!(
            "event=entry_query module=provider status=ok kind={} rows={}",
            resolved.kind().as_str(),
            values.len()
        );
        Ok(RowSet::new(
            locator.clone(),
            columns,
            values,
            &self.observers,
        ))
    }

    fn insert(&self, locator: &Locator, values: &EntryValues) -> ProviderResult<Locator> {
        if let ResolvedLocator::Item(_) = self.route(Operation::Insert, locator)? {
            warn!(
                "event=entry_insert module=provider status=error error_code=unsupported_resource locator={locator}"
            );
            return Err(ProviderError::UnsupportedResource {
                operation: Operation::Insert,
                locator: locator.clone(),
            });
        }
        values.validate_for_insert(self.options.validate_summary_on_insert)?;

        let conn = self.connection()?;
        let id = insert_row(conn, values).map_err(|err| {
            error!(
                "event=entry_insert module=provider status=error error_code=write_failed locator={locator} error={err}"
            );
            ProviderError::WriteFailed {
                locator: locator.clone(),
                source: err,
            }
        })?;

        info!("event=entry_insert module=provider status=ok id={id}");
        self.observers.notify_change(locator);
        Ok(locator.with_appended_id(id))
    }

    fn update(
        &self,
        locator: &Locator,
        values: &EntryValues,
        selection: &Selection,
    ) -> ProviderResult<usize> {
        let resolved = self.route(Operation::Update, locator)?;
        values.validate_for_update()?;
        if values.is_empty() {
            return Ok(0);
        }

        let selection = effective_selection(resolved, selection);
        let assignments: Vec<String> = values
            .iter()
            .map(|(field, _)| format!("{field} = ?"))
            .collect();
        let sql = format!(
            "UPDATE {TABLE_NAME} SET {}{};",
            assignments.join(", "),
            selection.where_sql()
        );
        let mut bind: Vec<Value> = values.iter().map(|(_, value)| text_value(value)).collect();
        bind.extend(selection.args().iter().cloned());

        let changed = self.connection()?.execute(&sql, params_from_iter(bind))?;

        info!(
            "event=entry_update module=provider status=ok kind={} rows={changed}",
            resolved.kind().as_str()
        );
        if changed > 0 {
            self.observers.notify_change(locator);
        }
        Ok(changed)
    }

    fn delete(&self, locator: &Locator, selection: &Selection) -> ProviderResult<usize> {
        let resolved = self.route(Operation::Delete, locator)?;
        let selection = effective_selection(resolved, selection);
        let sql = format!("DELETE FROM {TABLE_NAME}{};", selection.where_sql());

        let changed = self
            .connection()?
            .execute(&sql, params_from_iter(selection.args()))?;

        info!(
            "event=entry_delete module=provider status=ok kind={} rows={changed}",
            resolved.kind().as_str()
        );
        if changed > 0 {
            self.observers.notify_change(locator);
        }
        Ok(changed)
    }

    fn resource_type(&self, locator: &Locator) -> ProviderResult<ResourceKind> {
        match self.routes.resolve(locator) {
            Some(resolved) => Ok(resolved.kind()),
            None => {
                error!(
                    "event=resource_type module=provider status=error error_code=internal_inconsistency locator={locator}"
                );
                Err(ProviderError::InternalInconsistency {
                    locator: locator.clone(),
                })
            }
        }
    }
}

fn effective_selection(resolved: ResolvedLocator, requested: &Selection) -> Selection {
    match resolved {
        ResolvedLocator::Collection => requested.clone(),
        ResolvedLocator::Item(id) => Selection::by_id(id),
    }
}

fn insert_row(conn: &Connection, values: &EntryValues) -> Result<EntryId, DbError> {
    let columns: Vec<&str> = values.iter().map(|(field, _)| field.as_str()).collect();
    let sql = if columns.is_empty() {
        format!("INSERT INTO {TABLE_NAME} DEFAULT VALUES;")
    } else {
        let placeholders = vec!["?"; columns.len()].join(", ");
        format!(
            "INSERT INTO {TABLE_NAME} ({}) VALUES ({placeholders});",
            columns.join(", ")
        )
    };
    let bind: Vec<Value> = values.iter().map(|(_, value)| text_value(value)).collect();

    conn.execute(&sql, params_from_iter(bind))?;
    Ok(EntryId::new(conn.last_insert_rowid()))
}

fn text_value(value: Option<&str>) -> Value {
    match value {
        Some(text) => Value::Text(text.to_string()),
        None => Value::Null,
    }
}
