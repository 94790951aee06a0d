//! Journal entry use-case service.
//!
//! # Responsibility
//! - Provide id-based entry APIs on top of locator-level [`EntryAccess`].
//! - Implement editor save semantics for draft forms.
//!
//! # Invariants
//! - Service APIs never bypass provider routing or validation.
//! - A blank draft for a new entry never reaches storage.

use crate::contract::ResourceKind;
use crate::locator::Locator;
use crate::model::entry::{EntryDraft, EntryId, EntryValues, JournalEntry, NewEntry};
use crate::provider::{EntryAccess, EntryQuery, ProviderResult, Selection};
use chrono::NaiveDate;

const STORED_DATE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_DATE_FORMAT: &str = "%d/%b/%Y";

/// Result of [`EntryService::save_draft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// New draft with every box empty; nothing was written.
    Skipped,
    Created(Locator),
    /// Rows affected by the update; `0` when the entry no longer exists.
    Updated(usize),
}

/// Use-case service wrapper for journal entries.
pub struct EntryService<A: EntryAccess> {
    access: A,
}

impl<A: EntryAccess> EntryService<A> {
    pub fn new(access: A) -> Self {
        Self { access }
    }

    /// Lists every entry in storage order.
    pub fn list_entries(&self) -> ProviderResult<Vec<JournalEntry>> {
        self.access
            .query(&Locator::entries(), &EntryQuery::all())?
            .entries()
    }

    /// Gets one entry by id.
    pub fn get_entry(&self, id: EntryId) -> ProviderResult<Option<JournalEntry>> {
        let rows = self.access.query(&Locator::entry(id), &EntryQuery::all())?;
        Ok(rows.entries()?.into_iter().next())
    }

    /// Creates an entry and returns its item locator.
    pub fn create_entry(&self, entry: &NewEntry) -> ProviderResult<Locator> {
        self.access.insert(&Locator::entries(), &entry.to_values())
    }

    /// Applies a partial update to one entry.
    pub fn update_entry(&self, id: EntryId, values: &EntryValues) -> ProviderResult<usize> {
        self.access
            .update(&Locator::entry(id), values, &Selection::all())
    }

    pub fn delete_entry(&self, id: EntryId) -> ProviderResult<usize> {
        self.access.delete(&Locator::entry(id), &Selection::all())
    }

    pub fn delete_all_entries(&self) -> ProviderResult<usize> {
        self.access.delete(&Locator::entries(), &Selection::all())
    }

    pub fn resource_kind(&self, locator: &Locator) -> ProviderResult<ResourceKind> {
        self.access.resource_type(locator)
    }

    /// Saves editor form state.
    ///
    /// # Contract
    /// - `existing = None` with a blank draft returns `Skipped`.
    /// - `existing = None` otherwise inserts all four fields.
    /// - `existing = Some(id)` overwrites all four fields of that entry.
    pub fn save_draft(
        &self,
        draft: &EntryDraft,
        existing: Option<EntryId>,
    ) -> ProviderResult<SaveOutcome> {
        match existing {
            None if draft.is_blank() => Ok(SaveOutcome::Skipped),
            None => self
                .access
                .insert(&Locator::entries(), &draft.to_values())
                .map(SaveOutcome::Created),
            Some(id) => self
                .update_entry(id, &draft.to_values())
                .map(SaveOutcome::Updated),
        }
    }
}

/// Formats a stored `yyyy-MM-dd` date as `dd/MMM/yyyy` for display.
///
/// Returns `None` when the stored text is not a valid date.
pub fn display_date(stored: &str) -> Option<String> {
    NaiveDate::parse_from_str(stored.trim(), STORED_DATE_FORMAT)
        .ok()
        .map(|date| date.format(DISPLAY_DATE_FORMAT).to_string())
}
