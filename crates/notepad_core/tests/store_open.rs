use notepad_core::db::DbError;
use notepad_core::{NoteStore, Selection, StoreConfig, StoreError};
use rusqlite::Connection;

#[test]
fn config_deserializes_with_defaults() {
    let config: StoreConfig = serde_json::from_str(
        r#"{ "authority": "org.example.notes", "untitled_title": "Sans titre" }"#,
    )
    .unwrap();

    assert_eq!(config.authority, "org.example.notes");
    assert_eq!(config.untitled_title, "Sans titre");
    assert!(config.database_path.is_none());
    assert!(config.validate_colors);
}

#[test]
fn store_serves_its_configured_authority_only() {
    let config = StoreConfig {
        authority: "org.example.notes".to_string(),
        ..StoreConfig::default()
    };
    let store = NoteStore::open(config).unwrap();

    assert!(store
        .query("content://org.example.notes/notes", None, &Selection::all(), None)
        .is_ok());
    let err = store
        .query(
            "content://com.google.provider.NotePad/notes",
            None,
            &Selection::all(),
            None,
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::UnknownResource(_)));
}

#[test]
fn unopenable_database_is_storage_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("note_pad.db");
    let err = NoteStore::open(StoreConfig::with_database(path)).unwrap_err();
    assert!(matches!(err, StoreError::StorageUnavailable(_)));
}

#[test]
fn newer_schema_is_storage_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    Connection::open(&path)
        .unwrap()
        .execute_batch("PRAGMA user_version = 42;")
        .unwrap();

    let err = NoteStore::open(StoreConfig::with_database(&path)).unwrap_err();
    assert!(matches!(
        err,
        StoreError::StorageUnavailable(DbError::UnsupportedSchemaVersion { .. })
    ));
}

#[test]
fn notes_survive_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("note_pad.db");
    let uri = "content://com.google.provider.NotePad/notes";

    {
        let store = NoteStore::open(StoreConfig::with_database(&path)).unwrap();
        store
            .insert(uri, notepad_core::ContentValues::new().with("note", "kept"))
            .unwrap();
    }

    let store = NoteStore::open(StoreConfig::with_database(&path)).unwrap();
    let rows = store.query(uri, None, &Selection::all(), None).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.get_str(0, "note"), Some("kept"));
}

#[test]
fn store_and_its_handles_format_for_diagnostics() {
    let store = NoteStore::open(StoreConfig::in_memory()).unwrap();
    let uri = "content://com.google.provider.NotePad/notes";
    let subscription = store.register_observer(uri, true).unwrap();
    let id = store
        .insert(uri, notepad_core::ContentValues::new().with("note", "x"))
        .unwrap();
    let stream = store
        .open_typed_stream(&format!("{uri}/{id}"), "text/plain")
        .unwrap();

    let store_debug = format!("{store:?}");
    assert!(store_debug.contains("com.google.provider.NotePad"), "{store_debug}");
    assert!(store_debug.contains("observers: 1"), "{store_debug}");
    assert!(format!("{stream:?}").contains("text/plain"));
    assert!(format!("{subscription:?}").contains("ChangeSubscription"));
}
