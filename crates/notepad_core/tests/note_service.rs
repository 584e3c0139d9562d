use notepad_core::{NoteOrder, NoteService, NoteServiceError, NoteStore, StoreConfig};
use std::sync::Arc;

fn service() -> NoteService {
    NoteService::new(Arc::new(NoteStore::open(StoreConfig::in_memory()).unwrap()))
}

#[test]
fn create_note_derives_title_and_defaults() {
    let service = service();
    let note = service
        .create_note("buy milk and eggs before the shop closes tonight")
        .unwrap();

    assert_eq!(note.title, "buy milk and eggs before the");
    assert_eq!(note.body, "buy milk and eggs before the shop closes tonight");
    assert_eq!(note.background_color, "#FFFFFF");
    assert!(note.modified >= note.created);
    assert_eq!(service.get_note(note.id).unwrap(), Some(note));
}

#[test]
fn update_text_stamps_modified_and_keeps_title() {
    let service = service();
    let note = service.create_note("draft").unwrap();

    let updated = service.update_note_text(note.id, "final text").unwrap();
    assert_eq!(updated.body, "final text");
    assert_eq!(updated.title, "draft");
    assert!(updated.modified >= note.modified);

    let renamed = service.rename_note(note.id, "Final").unwrap();
    assert_eq!(renamed.title, "Final");
}

#[test]
fn edits_to_missing_notes_report_not_found() {
    let service = service();
    assert!(matches!(
        service.update_note_text(77, "x").unwrap_err(),
        NoteServiceError::NoteNotFound(77)
    ));
    assert!(matches!(
        service.set_background_color(77, "Red").unwrap_err(),
        NoteServiceError::NoteNotFound(77)
    ));
    assert_eq!(service.get_note(77).unwrap(), None);
    assert!(!service.delete_note(77).unwrap());
}

#[test]
fn background_color_accepts_palette_names_and_hex() {
    let service = service();
    let note = service.create_note("colorful").unwrap();

    let red = service.set_background_color(note.id, "red").unwrap();
    assert_eq!(red.background_color, "#FF0000");

    let custom = service.set_background_color(note.id, "#12ab34").unwrap();
    assert_eq!(custom.background_color, "#12AB34");

    let err = service.set_background_color(note.id, "chartreuse").unwrap_err();
    assert!(matches!(err, NoteServiceError::InvalidColor(_)));
    assert_eq!(
        service.get_note(note.id).unwrap().unwrap().background_color,
        "#12AB34"
    );
}

#[test]
fn search_matches_title_or_body_literally() {
    let service = service();
    let groceries = service.create_note("groceries: milk").unwrap();
    let sale = service.create_note("sale 50% off").unwrap();
    service.create_note("meeting notes").unwrap();
    let renamed = service.create_note("body mentions nothing").unwrap();
    service.rename_note(renamed.id, "Milk run").unwrap();

    let ids: Vec<_> = service
        .search_notes("milk", NoteOrder::Modified)
        .unwrap()
        .into_iter()
        .map(|note| note.id)
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&groceries.id));
    assert!(ids.contains(&renamed.id));

    let percent = service.search_notes("50%", NoteOrder::Modified).unwrap();
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].id, sale.id);
    assert!(service.search_notes("5_%", NoteOrder::Modified).unwrap().is_empty());

    assert_eq!(service.search_notes("  ", NoteOrder::Modified).unwrap().len(), 4);
}

#[test]
fn list_is_most_recently_modified_first_and_delete_removes() {
    let service = service();
    let first = service.create_note("first").unwrap();
    let second = service.create_note("second").unwrap();
    std::thread::sleep(std::time::Duration::from_millis(5));
    service.update_note_text(first.id, "first, edited").unwrap();

    let listed: Vec<_> = service
        .list_notes(NoteOrder::default())
        .unwrap()
        .into_iter()
        .map(|note| note.id)
        .collect();
    assert_eq!(listed, [first.id, second.id]);

    assert!(service.delete_note(first.id).unwrap());
    assert_eq!(service.list_notes(NoteOrder::Modified).unwrap().len(), 1);
}

#[test]
fn title_order_applies_to_lists_and_searches() {
    let service = service();
    let pears = service.create_note("pears for the tart").unwrap();
    let apples = service.create_note("apples for the tart").unwrap();
    let bread = service.create_note("bread").unwrap();
    std::thread::sleep(std::time::Duration::from_millis(5));
    service.update_note_text(pears.id, "pears, ripe, for the tart").unwrap();

    let ids = |notes: Vec<notepad_core::Note>| -> Vec<i64> {
        notes.into_iter().map(|note| note.id).collect()
    };

    assert_eq!(
        ids(service.list_notes(NoteOrder::Title).unwrap()),
        [apples.id, bread.id, pears.id]
    );
    assert_eq!(
        ids(service.search_notes("tart", NoteOrder::Title).unwrap()),
        [apples.id, pears.id]
    );
    assert_eq!(
        ids(service.search_notes("tart", NoteOrder::Modified).unwrap()),
        [pears.id, apples.id]
    );
}

#[test]
fn notes_serialize_with_their_column_values() {
    let service = service();
    let note = service.create_note("json me").unwrap();
    let json = serde_json::to_value(&note).unwrap();
    assert_eq!(json["title"], "json me");
    assert_eq!(json["background_color"], "#FFFFFF");
}
