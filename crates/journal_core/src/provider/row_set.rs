//! Query inputs and the row-set returned by provider reads.
//!
//! # Responsibility
//! - Describe a read: projection, filter with bound args, ordering.
//! - Carry result rows together with a change watch on the query locator.
//!
//! # Invariants
//! - Filter clauses use anonymous `?` placeholders; values are always bound,
//!   never spliced into SQL text.
//! - Projection and ordering only accept typed [`Column`] names.
//! - A row-set's change watch lives exactly as long as the row-set.

use crate::contract::Column;
use crate::locator::Locator;
use crate::model::entry::{EntryId, JournalEntry};
use crate::provider::observer::{ChangeObserver, ObserverRegistry};
use crate::provider::{ProviderError, ProviderResult};
use rusqlite::types::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// SQL filter clause plus its bound arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    clause: Option<String>,
    args: Vec<Value>,
}

impl Selection {
    /// Matches every row.
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter on a raw clause such as `title = ? AND date > ?`.
    pub fn new(clause: impl Into<String>) -> Self {
        let clause = clause.into();
        Self {
            clause: (!clause.trim().is_empty()).then_some(clause),
            args: Vec::new(),
        }
    }

    /// Binds the next `?` placeholder.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Filter on a single row id.
    pub fn by_id(id: EntryId) -> Self {
        Self::new(format!("{} = ?", Column::Id)).arg(id.get())
    }

    pub fn clause(&self) -> Option<&str> {
        self.clause.as_deref()
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub(crate) fn where_sql(&self) -> String {
        match &self.clause {
            Some(clause) => format!(" WHERE ({clause})"),
            None => String::new(),
        }
    }
}

/// One ordering term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: Column,
    pub descending: bool,
}

impl OrderBy {
    pub fn asc(column: Column) -> Self {
        Self {
            column,
            descending: false,
        }
    }

    pub fn desc(column: Column) -> Self {
        Self {
            column,
            descending: true,
        }
    }

    fn sql(self) -> String {
        let direction = if self.descending { "DESC" } else { "ASC" };
        format!("{} {direction}", self.column)
    }
}

/// Read request for [`crate::provider::JournalProvider::query`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryQuery {
    /// Columns to return; `None` returns every column.
    pub projection: Option<Vec<Column>>,
    pub selection: Selection,
    /// Empty means storage order.
    pub order: Vec<OrderBy>,
}

impl EntryQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        self.projection = Some(columns.into_iter().collect());
        self
    }

    pub fn filter(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order.push(order);
        self
    }

    /// Projected columns, defaulting to every column.
    pub(crate) fn resolved_columns(&self) -> Vec<Column> {
        match &self.projection {
            Some(columns) if !columns.is_empty() => columns.clone(),
            _ => Column::ALL.to_vec(),
        }
    }

    pub(crate) fn order_sql(&self) -> String {
        if self.order.is_empty() {
            return String::new();
        }
        let terms: Vec<String> = self.order.iter().map(|order| order.sql()).collect();
        format!(" ORDER BY {}", terms.join(", "))
    }
}

/// Flag flipped when the row-set's locator is notified.
#[derive(Default)]
struct ChangeWatch {
    changed: AtomicBool,
}

impl ChangeObserver for ChangeWatch {
    fn on_change(&self, _locator: &Locator) {
        self.changed.store(true, Ordering::SeqCst);
    }
}

/// Rows returned by a provider read.
///
/// The row-set watches the locator it was queried with. After a matching
/// change notification [`RowSet::has_changed`] reports `true`; query again to
/// get fresh rows.
pub struct RowSet {
    locator: Locator,
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
    watch: Arc<ChangeWatch>,
}

impl RowSet {
    pub(crate) fn new(
        locator: Locator,
        columns: Vec<Column>,
        rows: Vec<Vec<Value>>,
        observers: &ObserverRegistry,
    ) -> Self {
        let watch = Arc::new(ChangeWatch::default());
        observers.register(locator.clone(), true, &watch);
        Self {
            locator,
            columns,
            rows,
            watch,
        }
    }

    /// Locator this row-set watches.
    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_changed(&self) -> bool {
        self.watch.changed.load(Ordering::SeqCst)
    }

    pub fn row(&self, index: usize) -> Option<RowRef<'_>> {
        self.rows.get(index).map(|values| RowRef {
            columns: &self.columns,
            values,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> + '_ {
        self.rows.iter().map(|values| RowRef {
            columns: &self.columns,
            values,
        })
    }

    /// Converts every row into a [`JournalEntry`].
    ///
    /// # Errors
    /// - `InvalidRow` when the projection lacks a column or a value has the
    ///   wrong storage type.
    pub fn entries(&self) -> ProviderResult<Vec<JournalEntry>> {
        self.rows().map(|row| row.to_entry()).collect()
    }
}

impl std::fmt::Debug for RowSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowSet")
            .field("locator", &self.locator)
            .field("columns", &self.columns)
            .field("rows", &self.rows.len())
            .field("changed", &self.has_changed())
            .finish()
    }
}

/// Borrowed view of one row.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    columns: &'a [Column],
    values: &'a [Value],
}

impl<'a> RowRef<'a> {
    pub fn get(&self, column: Column) -> Option<&'a Value> {
        let index = self.columns.iter().position(|c| *c == column)?;
        self.values.get(index)
    }

    /// Text value of `column`; `None` when absent, null, or not text.
    pub fn text(&self, column: Column) -> Option<&'a str> {
        match self.get(column)? {
            Value::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn id(&self) -> Option<EntryId> {
        match self.get(Column::Id)? {
            Value::Integer(id) => Some(EntryId::new(*id)),
            _ => None,
        }
    }

    pub fn to_entry(&self) -> ProviderResult<JournalEntry> {
        let id = self.id().ok_or_else(|| invalid_row(Column::Id))?;
        let required = |column: Column| {
            self.text(column)
                .map(str::to_string)
                .ok_or_else(|| invalid_row(column))
        };
        let message = match self.get(Column::Message) {
            Some(Value::Text(text)) => Some(text.clone()),
            Some(Value::Null) => None,
            _ => return Err(invalid_row(Column::Message)),
        };

        Ok(JournalEntry {
            id,
            date: required(Column::Date)?,
            title: required(Column::Title)?,
            summary: required(Column::Summary)?,
            message,
        })
    }
}

fn invalid_row(column: Column) -> ProviderError {
    ProviderError::InvalidRow(format!("missing or mistyped column `{column}`"))
}

#[cfg(test)]
mod tests {
    use super::{EntryQuery, OrderBy, RowSet, Selection};
    use crate::contract::Column;
    use crate::locator::Locator;
    use crate::model::entry::EntryId;
    use crate::provider::observer::ObserverRegistry;
    use crate::provider::ProviderError;
    use rusqlite::types::Value;

    #[test]
    fn blank_clause_selects_everything() {
        assert_eq!(Selection::new("  ").where_sql(), "");
        assert_eq!(Selection::all().clause(), None);
        assert_eq!(
            Selection::new("title = ?").where_sql(),
            " WHERE (title = ?)"
        );
    }

    #[test]
    fn by_id_binds_integer_argument() {
        let selection = Selection::by_id(EntryId::new(4));
        assert_eq!(selection.clause(), Some("_id = ?"));
        assert_eq!(selection.args(), &[Value::Integer(4)]);
    }

    #[test]
    fn query_defaults_to_every_column_and_storage_order() {
        let query = EntryQuery::all();
        assert_eq!(query.resolved_columns(), Column::ALL.to_vec());
        assert_eq!(query.order_sql(), "");

        let query = EntryQuery::all()
            .columns([Column::Title])
            .order_by(OrderBy::desc(Column::Date))
            .order_by(OrderBy::asc(Column::Id));
        assert_eq!(query.resolved_columns(), vec![Column::Title]);
        assert_eq!(query.order_sql(), " ORDER BY date DESC, _id ASC");
    }

    #[test]
    fn row_converts_to_entry_and_reports_missing_columns() {
        let registry = ObserverRegistry::new();
        let rows = RowSet::new(
            Locator::entries(),
            vec![Column::Id, Column::Date, Column::Title, Column::Summary, Column::Message],
            vec![vec![
                Value::Integer(1),
                Value::Text("2024-01-01".into()),
                Value::Text("T".into()),
                Value::Text("S".into()),
                Value::Null,
            ]],
            &registry,
        );
        let entries = rows.entries().unwrap();
        assert_eq!(entries[0].id, EntryId::new(1));
        assert_eq!(entries[0].message, None);

        let partial = RowSet::new(
            Locator::entries(),
            vec![Column::Id, Column::Title],
            vec![vec![Value::Integer(1), Value::Text("T".into())]],
            &registry,
        );
        assert_eq!(partial.row(0).unwrap().text(Column::Title), Some("T"));
        assert!(matches!(
            partial.entries(),
            Err(ProviderError::InvalidRow(_))
        ));
    }

    #[test]
    fn row_set_watch_flips_on_notification_and_unregisters_on_drop() {
        let registry = ObserverRegistry::new();
        let rows = RowSet::new(Locator::entries(), Vec::new(), Vec::new(), &registry);
        assert!(!rows.has_changed());

        registry.notify_change(&Locator::entry(EntryId::new(1)));
        assert!(rows.has_changed());

        drop(rows);
        assert!(registry.is_empty());
    }
}
