use notepad_core::{ContentValues, NoteStore, Selection, StoreConfig, StoreError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const NOTES: &str = "content://com.google.provider.NotePad/notes";

fn store() -> NoteStore {
    NoteStore::open(StoreConfig::in_memory()).unwrap()
}

fn uris(events: Vec<notepad_core::ChangeEvent>) -> Vec<String> {
    events.into_iter().map(|event| event.uri.to_string()).collect()
}

#[test]
fn insert_notifies_the_new_item() {
    let store = store();
    let collection = store.register_observer(NOTES, true).unwrap();
    let flat = store.register_observer(NOTES, false).unwrap();

    let id = store.insert(NOTES, ContentValues::new()).unwrap();

    assert_eq!(uris(collection.drain()), [format!("{NOTES}/{id}")]);
    assert!(flat.try_next().is_none());

    let item = store
        .register_observer(&format!("{NOTES}/{id}"), false)
        .unwrap();
    store
        .update(
            &format!("{NOTES}/{id}"),
            &ContentValues::new().with("title", "x"),
            &Selection::all(),
        )
        .unwrap();
    assert_eq!(uris(item.drain()), [format!("{NOTES}/{id}")]);
}

#[test]
fn collection_changes_reach_item_observers() {
    let store = store();
    let id = store.insert(NOTES, ContentValues::new()).unwrap();
    let item = store
        .register_observer(&format!("{NOTES}/{id}"), false)
        .unwrap();

    store
        .update(NOTES, &ContentValues::new().with("note", "all"), &Selection::all())
        .unwrap();
    assert_eq!(uris(item.drain()), [NOTES.to_string()]);
}

#[test]
fn update_and_delete_notify_even_when_nothing_matched() {
    let store = store();
    let observer = store.register_observer(NOTES, true).unwrap();
    let missing = format!("{NOTES}/404");

    let count = store
        .update(&missing, &ContentValues::new().with("note", "x"), &Selection::all())
        .unwrap();
    assert_eq!(count, 0);
    let count = store.delete(&missing, &Selection::all()).unwrap();
    assert_eq!(count, 0);

    assert_eq!(uris(observer.drain()), [missing.clone(), missing]);
}

#[test]
fn mutations_notify_the_standard_item_identifier() {
    let store = store();
    let id = store.insert(NOTES, ContentValues::new()).unwrap();
    let item = store
        .register_observer(&format!("{NOTES}/{id}"), false)
        .unwrap();
    let padded = format!("{NOTES}/00{id}/");

    let count = store
        .update(&padded, &ContentValues::new().with("note", "x"), &Selection::all())
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(store.delete(&padded, &Selection::all()).unwrap(), 1);

    let expected = format!("{NOTES}/{id}");
    assert_eq!(uris(item.drain()), [expected.clone(), expected]);
}

#[test]
fn failed_mutations_do_not_notify() {
    let store = store();
    let observer = store.register_observer(NOTES, true).unwrap();

    let err = store
        .insert(NOTES, ContentValues::new().with("background_color", "nope"))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidValue { .. }));
    let err = store
        .update(NOTES, &ContentValues::new(), &Selection::all())
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidValue { .. }));

    assert!(observer.try_next().is_none());
}

#[test]
fn unregistered_and_dropped_observers_stop_receiving() {
    let store = store();
    let kept = store.register_observer(NOTES, true).unwrap();
    let removed = store.register_observer(NOTES, true).unwrap();
    drop(store.register_observer(NOTES, true).unwrap());

    assert!(store.unregister_observer(removed.id()));
    assert!(!store.unregister_observer(removed.id()));

    store.insert(NOTES, ContentValues::new()).unwrap();
    assert_eq!(kept.drain().len(), 1);
    assert!(removed.try_next().is_none());
}

#[test]
fn observers_receive_changes_from_other_threads() {
    let store = Arc::new(store());
    let observer = store.register_observer(NOTES, true).unwrap();

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || store.insert(NOTES, ContentValues::new().with("note", "bg")))
    };
    let id = writer.join().unwrap().unwrap();

    let event = observer.next_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(event.uri.to_string(), format!("{NOTES}/{id}"));
}

#[test]
fn observer_identifiers_must_parse() {
    let store = store();
    let err = store.register_observer("notes", true).unwrap_err();
    assert!(matches!(err, StoreError::UnknownResource(_)));
}
