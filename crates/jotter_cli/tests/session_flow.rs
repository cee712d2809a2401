use jotter_cli::Session;
use jotter_core::{LoadError, Note, NoteStore};
use std::fs;
use std::io::Cursor;
use std::path::Path;

fn run_script(store: NoteStore, script: &str) -> (NoteStore, String) {
    let mut output = Vec::new();
    let mut session = Session::new(Cursor::new(script.to_string()), &mut output, store);
    session.run().unwrap();
    let store = session.into_store();
    (store, String::from_utf8(output).unwrap())
}

/// Asserts a `<prefix>dd.mm.yyyy HH:MM)` list line is present.
fn assert_list_line(output: &str, prefix: &str) {
    let line = output
        .lines()
        .find(|line| line.starts_with(prefix))
        .unwrap_or_else(|| panic!("no list line starting with {prefix:?} in:\n{output}"));
    let stamp = line
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap();
    assert_eq!(stamp.len(), "dd.mm.yyyy HH:MM".len(), "line: {line}");
    assert_eq!(&stamp[2..3], ".");
    assert_eq!(&stamp[5..6], ".");
    assert_eq!(&stamp[10..11], " ");
    assert_eq!(&stamp[13..14], ":");
}

fn fresh_store(dir: &Path) -> NoteStore {
    NoteStore::load(dir.join("notes.dat")).unwrap()
}

#[test]
fn add_then_exit_persists_note() {
    let dir = tempfile::tempdir().unwrap();
    let script = "2\nShopping\nmilk\nbread\n\n\n6\n";
    let (store, output) = run_script(fresh_store(dir.path()), script);

    assert!(output.contains("Note added."));
    assert!(output.contains("Notes saved."));
    assert_eq!(store.len(), 1);

    let reloaded = NoteStore::load(dir.path().join("notes.dat")).unwrap();
    let note = reloaded.get(0).unwrap();
    assert_eq!(note.title, "Shopping");
    assert_eq!(note.content, "milk\nbread");
    assert_eq!(note.modified(), None);
}

#[test]
fn end_of_input_saves_like_exit() {
    let dir = tempfile::tempdir().unwrap();
    let (_, output) = run_script(fresh_store(dir.path()), "2\nT\nbody\n");
    assert!(output.contains("Notes saved."));
    assert_eq!(
        NoteStore::load(dir.path().join("notes.dat")).unwrap().len(),
        1
    );
}

#[test]
fn edit_with_blank_answers_keeps_text_and_marks_modified() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = fresh_store(dir.path());
    store.push(Note::new("A", "hello"));

    let script = "3\n1\nB\n\n\n1\n\n6\n";
    let (store, output) = run_script(store, script);

    assert!(output.contains("Current title (A): "));
    assert!(output.contains("Note updated."));
    assert!(output.contains("   Modified: "));
    assert_list_line(&output, "1. A (");
    assert_list_line(&output, "1. B (");
    let note = store.get(0).unwrap();
    assert_eq!(note.title, "B");
    assert_eq!(note.content, "hello");
    assert!(note.modified().is_some());
}

#[test]
fn invalid_numbers_are_reported_and_change_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = fresh_store(dir.path());
    store.push(Note::new("only", "note"));

    let script = "3\n0\n\n4\n2\n\n4\nabc\n\n6\n";
    let (store, output) = run_script(store, script);

    assert_eq!(output.matches("Invalid note number.").count(), 3);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(0).unwrap().modified(), None);
}

#[test]
fn empty_notebook_messages() {
    let dir = tempfile::tempdir().unwrap();
    let script = "1\n\n3\n\n4\n\n9\n\n6\n";
    let (_, output) = run_script(fresh_store(dir.path()), script);

    assert!(output.contains("No notes."));
    assert!(output.contains("No notes to edit."));
    assert!(output.contains("No notes to delete."));
    assert!(output.contains("Invalid choice."));
}

#[test]
fn search_and_delete_flow() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = fresh_store(dir.path());
    store.push(Note::new("Work", "call the bank\nabout the loan"));
    store.push(Note::new("Home", "fix the sink"));

    let script = "5\nBANK\n\n5\nzebra\n\n4\n1\n\n5\nbank\n\n6\n";
    let (store, output) = run_script(store, script);

    assert!(output.contains("1. Work\n   call the bank about the loan...\n"));
    assert!(output.contains("Note deleted."));
    assert_eq!(output.matches("No notes found.").count(), 2);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(0).unwrap().title, "Home");
}

#[test]
fn load_error_is_reported_and_session_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.dat");
    fs::write(&path, [1, 2, 3]).unwrap();

    let (store, load_error) = NoteStore::load_or_empty(&path);
    let load_error: LoadError = load_error.unwrap();
    let mut output = Vec::new();
    {
        let mut session = Session::new(Cursor::new("6\n"), &mut output, store);
        session.report_load_error(&load_error).unwrap();
        assert!(session.store().is_empty());
        session.run().unwrap();
    }

    let output = String::from_utf8(output).unwrap();
    assert!(output.contains("starting with an empty notebook"));
    assert_eq!(NoteStore::load(&path).unwrap().len(), 0);
}

#[test]
fn save_failure_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("notes.dat.tmp")).unwrap();
    let (_, output) = run_script(fresh_store(dir.path()), "2\nx\ny\n\n\n6\n");
    assert!(output.contains("Failed to save notes:"));
}
