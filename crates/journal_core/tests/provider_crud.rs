use journal_core::{
    Column, EntryAccess, EntryId, EntryQuery, EntryValues, Field, JournalProvider, Locator,
    Operation, OrderBy, ProviderError, ProviderOptions, ResourceKind, Selection,
};
use journal_core::{JournalStore, StoreLocation};

fn full_values(date: &str, title: &str, summary: &str, message: &str) -> EntryValues {
    EntryValues::new()
        .with(Field::Date, date)
        .with(Field::Title, title)
        .with(Field::Summary, summary)
        .with(Field::Message, message)
}

fn row_count(provider: &JournalProvider) -> usize {
    provider
        .query(&Locator::entries(), &EntryQuery::all())
        .unwrap()
        .len()
}

#[test]
fn insert_returns_item_locator_that_reads_back_same_fields() {
    let provider = JournalProvider::in_memory();

    let created = provider
        .insert(
            &Locator::entries(),
            &full_values("2024-03-01", "Title", "Summary", "Body"),
        )
        .unwrap();
    let id = created.last_id().unwrap();
    assert_eq!(created, Locator::entry(id));

    let rows = provider.query(&created, &EntryQuery::all()).unwrap();
    let entries = rows.entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, id);
    assert_eq!(entries[0].date, "2024-03-01");
    assert_eq!(entries[0].title, "Title");
    assert_eq!(entries[0].summary, "Summary");
    assert_eq!(entries[0].message.as_deref(), Some("Body"));
}

#[test]
fn insert_through_suffixed_collection_locator_returns_readable_item() {
    let provider = JournalProvider::in_memory();
    let collection = Locator::new("content://com.feghas.jounalapp.data/thoughts/?x=1");

    let created = provider
        .insert(&collection, &full_values("2024-03-02", "Query", "s", ""))
        .unwrap();

    assert_eq!(provider.resource_type(&created).unwrap(), ResourceKind::Item);
    let id = created.last_id().unwrap();
    assert_eq!(created, Locator::entry(id));
    let entries = provider
        .query(&created, &EntryQuery::all())
        .unwrap()
        .entries()
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title, "Query");
}

#[test]
fn insert_without_date_or_title_fails_and_persists_nothing() {
    let provider = JournalProvider::in_memory();

    let no_date = EntryValues::new()
        .with(Field::Title, "t")
        .with(Field::Summary, "s");
    let err = provider.insert(&Locator::entries(), &no_date).unwrap_err();
    assert!(matches!(err, ProviderError::MissingRequiredField(Field::Date)));

    let null_title = EntryValues::new()
        .with(Field::Date, "2024-01-01")
        .with_null(Field::Title)
        .with(Field::Summary, "s");
    let err = provider.insert(&Locator::entries(), &null_title).unwrap_err();
    assert!(matches!(
        err,
        ProviderError::MissingRequiredField(Field::Title)
    ));

    assert_eq!(row_count(&provider), 0);
}

#[test]
fn insert_summary_check_follows_provider_options() {
    let values = EntryValues::new()
        .with(Field::Date, "2024-01-01")
        .with(Field::Title, "t");

    let strict = JournalProvider::in_memory();
    assert!(matches!(
        strict.insert(&Locator::entries(), &values),
        Err(ProviderError::MissingRequiredField(Field::Summary))
    ));

    let lenient = JournalProvider::with_options(
        JournalStore::in_memory(),
        ProviderOptions {
            validate_summary_on_insert: false,
        },
    );
    let err = lenient.insert(&Locator::entries(), &values).unwrap_err();
    match err {
        ProviderError::WriteFailed { locator, .. } => assert_eq!(locator, Locator::entries()),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(row_count(&lenient), 0);
}

#[test]
fn insert_on_item_locator_is_unsupported() {
    let provider = JournalProvider::in_memory();

    let err = provider
        .insert(
            &Locator::entry(EntryId::new(1)),
            &full_values("2024-01-01", "t", "s", ""),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::UnsupportedResource {
            operation: Operation::Insert,
            ..
        }
    ));
}

#[test]
fn update_with_null_required_field_leaves_row_unchanged() {
    let provider = JournalProvider::in_memory();
    let item = provider
        .insert(&Locator::entries(), &full_values("2024-01-01", "T1", "S1", "M1"))
        .unwrap();

    let err = provider
        .update(
            &item,
            &EntryValues::new().with_null(Field::Title),
            &Selection::all(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::MissingRequiredField(Field::Title)
    ));

    let entry = provider
        .query(&item, &EntryQuery::all())
        .unwrap()
        .entries()
        .unwrap()
        .remove(0);
    assert_eq!(entry.title, "T1");
}

#[test]
fn update_allows_null_message() {
    let provider = JournalProvider::in_memory();
    let item = provider
        .insert(&Locator::entries(), &full_values("2024-01-01", "T1", "S1", "M1"))
        .unwrap();

    let changed = provider
        .update(
            &item,
            &EntryValues::new().with_null(Field::Message),
            &Selection::all(),
        )
        .unwrap();
    assert_eq!(changed, 1);

    let rows = provider.query(&item, &EntryQuery::all()).unwrap();
    assert_eq!(rows.entries().unwrap()[0].message, None);
}

#[test]
fn empty_update_returns_zero_without_opening_storage() {
    let provider = JournalProvider::in_memory();

    let changed = provider
        .update(&Locator::entries(), &EntryValues::new(), &Selection::all())
        .unwrap();

    assert_eq!(changed, 0);
    assert!(!provider.store().is_open());
}

#[test]
fn item_update_ignores_caller_filter() {
    let provider = JournalProvider::in_memory();
    let first = provider
        .insert(&Locator::entries(), &full_values("2024-01-01", "a", "s", ""))
        .unwrap();
    provider
        .insert(&Locator::entries(), &full_values("2024-01-02", "b", "s", ""))
        .unwrap();

    let changed = provider
        .update(
            &first,
            &EntryValues::new().with(Field::Summary, "changed"),
            &Selection::new("1 = 1"),
        )
        .unwrap();
    assert_eq!(changed, 1);

    let rows = provider
        .query(
            &Locator::entries(),
            &EntryQuery::all().filter(Selection::new("summary = ?").arg("changed".to_string())),
        )
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.row(0).unwrap().id(), first.last_id());
}

#[test]
fn collection_update_uses_caller_filter() {
    let provider = JournalProvider::in_memory();
    for date in ["2024-01-01", "2024-01-01", "2024-02-01"] {
        provider
            .insert(&Locator::entries(), &full_values(date, "t", "s", ""))
            .unwrap();
    }

    let changed = provider
        .update(
            &Locator::entries(),
            &EntryValues::new().with(Field::Title, "january"),
            &Selection::new("date = ?").arg("2024-01-01".to_string()),
        )
        .unwrap();
    assert_eq!(changed, 2);
}

#[test]
fn item_delete_removes_exactly_one_row_once() {
    let provider = JournalProvider::in_memory();
    let first = provider
        .insert(&Locator::entries(), &full_values("2024-01-01", "a", "s", ""))
        .unwrap();
    provider
        .insert(&Locator::entries(), &full_values("2024-01-02", "b", "s", ""))
        .unwrap();

    assert_eq!(provider.delete(&first, &Selection::all()).unwrap(), 1);
    assert_eq!(provider.delete(&first, &Selection::all()).unwrap(), 0);
    assert_eq!(row_count(&provider), 1);
}

#[test]
fn collection_delete_without_filter_removes_everything() {
    let provider = JournalProvider::in_memory();
    for title in ["a", "b", "c"] {
        provider
            .insert(&Locator::entries(), &full_values("2024-01-01", title, "s", ""))
            .unwrap();
    }

    let removed = provider
        .delete(
            &Locator::entries(),
            &Selection::new("title = ?").arg("a".to_string()),
        )
        .unwrap();
    assert_eq!(removed, 1);

    assert_eq!(
        provider
            .delete(&Locator::entries(), &Selection::all())
            .unwrap(),
        2
    );
    assert_eq!(row_count(&provider), 0);
}

#[test]
fn item_query_ignores_caller_filter() {
    let provider = JournalProvider::in_memory();
    let first = provider
        .insert(&Locator::entries(), &full_values("2024-01-01", "a", "s", ""))
        .unwrap();
    provider
        .insert(&Locator::entries(), &full_values("2024-01-02", "b", "s", ""))
        .unwrap();

    let rows = provider
        .query(
            &first,
            &EntryQuery::all().filter(Selection::new("title = ?").arg("b".to_string())),
        )
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.row(0).unwrap().text(Column::Title), Some("a"));

    let missing = provider
        .query(&Locator::entry(EntryId::new(999)), &EntryQuery::all())
        .unwrap();
    assert!(missing.is_empty());
}

#[test]
fn query_honours_projection_and_order() {
    let provider = JournalProvider::in_memory();
    for (date, title) in [("2024-01-02", "b"), ("2024-01-03", "c"), ("2024-01-01", "a")] {
        provider
            .insert(&Locator::entries(), &full_values(date, title, "s", ""))
            .unwrap();
    }

    let rows = provider
        .query(
            &Locator::entries(),
            &EntryQuery::all()
                .columns([Column::Title, Column::Date])
                .order_by(OrderBy::desc(Column::Date)),
        )
        .unwrap();

    assert_eq!(rows.columns(), &[Column::Title, Column::Date]);
    let titles: Vec<_> = rows.rows().map(|row| row.text(Column::Title)).collect();
    assert_eq!(titles, vec![Some("c"), Some("b"), Some("a")]);
    assert_eq!(rows.row(0).unwrap().get(Column::Summary), None);
}

#[test]
fn unmatched_locators_fail_every_operation() {
    let provider = JournalProvider::in_memory();
    let unknown = Locator::new("content://com.feghas.jounalapp.data/pets");

    assert!(matches!(
        provider.query(&unknown, &EntryQuery::all()),
        Err(ProviderError::UnsupportedResource {
            operation: Operation::Query,
            ..
        })
    ));
    assert!(matches!(
        provider.insert(&unknown, &full_values("2024-01-01", "t", "s", "")),
        Err(ProviderError::UnsupportedResource {
            operation: Operation::Insert,
            ..
        })
    ));
    assert!(matches!(
        provider.update(&unknown, &EntryValues::new(), &Selection::all()),
        Err(ProviderError::UnsupportedResource {
            operation: Operation::Update,
            ..
        })
    ));
    assert!(matches!(
        provider.delete(&unknown, &Selection::all()),
        Err(ProviderError::UnsupportedResource {
            operation: Operation::Delete,
            ..
        })
    ));
    assert!(matches!(
        provider.resource_type(&unknown),
        Err(ProviderError::InternalInconsistency { .. })
    ));
}

#[test]
fn resource_type_reports_collection_and_item_tags() {
    let provider = JournalProvider::in_memory();

    let collection = provider.resource_type(&Locator::entries()).unwrap();
    assert_eq!(collection, ResourceKind::Collection);
    assert_eq!(
        collection.mime_type(),
        "vnd.android.cursor.dir/com.feghas.jounalapp.data/thoughts"
    );

    let item = provider
        .resource_type(&Locator::entry(EntryId::new(12)))
        .unwrap();
    assert_eq!(item, ResourceKind::Item);
    assert_eq!(
        item.mime_type(),
        "vnd.android.cursor.item/com.feghas.jounalapp.data/thoughts"
    );
}

#[test]
fn full_entry_lifecycle() {
    let provider = JournalProvider::in_memory();

    let created = provider
        .insert(&Locator::entries(), &full_values("2024-01-01", "T1", "S1", "M1"))
        .unwrap();
    assert_eq!(created.last_id(), Some(EntryId::new(1)));

    let item = Locator::entry(EntryId::new(1));
    let entries = provider
        .query(&item, &EntryQuery::all())
        .unwrap()
        .entries()
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title, "T1");
    assert_eq!(entries[0].summary, "S1");
    assert_eq!(entries[0].message.as_deref(), Some("M1"));

    let changed = provider
        .update(
            &item,
            &EntryValues::new().with(Field::Title, "T2"),
            &Selection::all(),
        )
        .unwrap();
    assert_eq!(changed, 1);
    let entries = provider
        .query(&item, &EntryQuery::all())
        .unwrap()
        .entries()
        .unwrap();
    assert_eq!(entries[0].title, "T2");
    assert_eq!(entries[0].date, "2024-01-01");

    assert_eq!(provider.delete(&item, &Selection::all()).unwrap(), 1);
    assert!(provider
        .query(&item, &EntryQuery::all())
        .unwrap()
        .is_empty());
}

#[test]
fn ids_are_not_reused_after_delete() {
    let provider = JournalProvider::in_memory();
    let first = provider
        .insert(&Locator::entries(), &full_values("2024-01-01", "a", "s", ""))
        .unwrap();
    provider.delete(&first, &Selection::all()).unwrap();

    let second = provider
        .insert(&Locator::entries(), &full_values("2024-01-01", "b", "s", ""))
        .unwrap();
    assert!(second.last_id() > first.last_id());
}

#[test]
fn file_backed_provider_persists_between_instances() {
    let dir = tempfile::tempdir().unwrap();

    let created = {
        let provider = JournalProvider::new(JournalStore::new(StoreLocation::in_dir(dir.path())));
        provider
            .insert(&Locator::entries(), &full_values("2024-01-01", "kept", "s", ""))
            .unwrap()
    };

    let provider = JournalProvider::new(JournalStore::new(StoreLocation::in_dir(dir.path())));
    let rows = provider.query(&created, &EntryQuery::all()).unwrap();
    assert_eq!(rows.entries().unwrap()[0].title, "kept");
}
