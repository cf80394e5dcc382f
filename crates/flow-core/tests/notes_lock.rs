use std::sync::Arc;

use flow_core::lock::{check_value, decode, encode, verify_passphrase, Passphrase};
use flow_core::model::NoteDraft;
use flow_core::store::{Collection, CollectionPath};
use flow_core::views::{NotePreview, NotesView};
use flow_core::{FlowError, MemoryStore, Session, UnlockError, User};

fn session() -> Session {
    Session::new(User::new("user-1", "user@example.com"))
}

fn passphrase(value: &str) -> Passphrase {
    Passphrase::new(value).expect("passphrase should be non-empty")
}

#[test]
fn test_meeting_notes_round_trip() {
    let sealed = encode("Meeting notes", &passphrase("sesame"));
    assert_ne!(sealed, "Meeting notes");

    let opened = decode(&sealed, &passphrase("sesame")).expect("decode should succeed");
    assert_eq!(opened, "Meeting notes");

    if let Ok(garbage) = decode(&sealed, &passphrase("wrong")) {
        assert_ne!(garbage, "Meeting notes");
    }
}

#[test]
fn test_check_value_identifies_passphrase() {
    let check = check_value("sesame");
    assert!(verify_passphrase("sesame", &check));
    assert!(!verify_passphrase("Sesame", &check));
    assert!(!verify_passphrase("", &check));
}

#[test]
fn test_locked_note_is_stored_sealed() {
    let store = Arc::new(MemoryStore::new());
    let mut view = NotesView::mount(store.clone(), session()).expect("mount should succeed");

    let id = view
        .save(
            NoteDraft::new("Diary", "dear diary").locked_with(passphrase("abc")),
            None,
        )
        .expect("save should succeed");

    let path = CollectionPath::new("user-1", Collection::Notes);
    let collections = store.collections();
    let stored = &collections[&path][&id];
    assert_eq!(stored["locked"], true);
    assert_eq!(stored["passwordHash"], check_value("abc"));
    assert_ne!(stored["content"], "dear diary");

    view.refresh();
    let note = view.find(&id).expect("note should be listed");
    assert_eq!(view.preview(note), NotePreview::Locked);
}

#[test]
fn test_start_edit_with_right_and_wrong_passphrase() {
    let store = Arc::new(MemoryStore::new());
    let mut view = NotesView::mount(store, session()).expect("mount should succeed");
    let id = view
        .save(
            NoteDraft::new("Plans", "launch on friday").locked_with(passphrase("abc")),
            None,
        )
        .expect("save should succeed");
    view.refresh();

    let err = view
        .start_edit(&id, Some("xyz"))
        .expect_err("wrong passphrase should fail");
    assert!(matches!(err, FlowError::Unlock(UnlockError::IncorrectPassphrase)));
    assert_eq!(err.user_message(), "Incorrect password!");
    assert!(view.unlocked().is_empty());

    let draft = view
        .start_edit(&id, Some("abc"))
        .expect("right passphrase should unlock");
    assert_eq!(draft.content, "launch on friday");
    assert!(draft.locked);
    assert!(view.unlocked().contains(&id));
    assert!(!view.needs_passphrase(&id).expect("note should exist"));
}

#[test]
fn test_plain_note_never_needs_passphrase() {
    let store = Arc::new(MemoryStore::new());
    let mut view = NotesView::mount(store, session()).expect("mount should succeed");
    let id = view
        .save(NoteDraft::new("Groceries", "milk, eggs"), None)
        .expect("save should succeed");
    view.refresh();

    assert!(!view.needs_passphrase(&id).expect("note should exist"));
    assert_eq!(
        view.view_note(&id, None).expect("plain note should open"),
        "milk, eggs"
    );
    assert!(view.unlocked().is_empty());
}

#[test]
fn test_delete_clears_unlocked_entry() {
    let store = Arc::new(MemoryStore::new());
    let mut view = NotesView::mount(store, session()).expect("mount should succeed");
    let id = view
        .save(
            NoteDraft::new("Secret", "shh").locked_with(passphrase("abc")),
            None,
        )
        .expect("save should succeed");
    view.refresh();

    assert_eq!(
        view.view_note(&id, Some("abc")).expect("should unlock"),
        "shh"
    );
    assert_eq!(view.unlocked().len(), 1);

    view.delete(&id).expect("delete should succeed");
    assert!(view.unlocked().is_empty());
    view.refresh();
    assert!(view.notes().is_empty());
}

#[test]
fn test_unlocked_set_resets_on_remount() {
    let store = Arc::new(MemoryStore::new());
    let id = {
        let mut view =
            NotesView::mount(store.clone(), session()).expect("mount should succeed");
        let id = view
            .save(
                NoteDraft::new("Secret", "shh").locked_with(passphrase("abc")),
                None,
            )
            .expect("save should succeed");
        view.refresh();
        view.view_note(&id, Some("abc")).expect("should unlock");
        id
    };

    let view = NotesView::mount(store, session()).expect("mount should succeed");
    assert!(view.unlocked().is_empty());
    assert!(view.needs_passphrase(&id).expect("note should exist"));
}

#[test]
fn test_snapshot_does_not_reset_unlocked_set() {
    let store = Arc::new(MemoryStore::new());
    let mut view = NotesView::mount(store.clone(), session()).expect("mount should succeed");
    let id = view
        .save(
            NoteDraft::new("Secret", "shh").locked_with(passphrase("abc")),
            None,
        )
        .expect("save should succeed");
    view.refresh();
    view.view_note(&id, Some("abc")).expect("should unlock");

    view.save(NoteDraft::new("Another", "text"), None)
        .expect("save should succeed");
    assert!(view.refresh() > 0);
    assert!(view.unlocked().contains(&id));
    assert_eq!(view.notes().len(), 2);
}
