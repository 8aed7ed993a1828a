use open_file::app::{
    DiffStatus, Direction, DocumentId, FileStore, FsReader, MemoryReader, MemoryStore,
    NoticeLevel, RawInput, SearchOptions, SessionController, SessionEvent, ThemeMode,
};

fn session_with(files: &[(&str, &str)]) -> (SessionController, MemoryReader) {
    let mut reader = MemoryReader::new();
    for (name, body) in files {
        reader.insert(*name, body.as_bytes());
    }
    (SessionController::new(Box::new(MemoryStore::new())), reader)
}

fn open(session: &mut SessionController, reader: &MemoryReader, name: &str) -> DocumentId {
    let input = reader.input(name).unwrap();
    session.open_document(input, reader).unwrap()
}

fn assert_active_valid(session: &SessionController) {
    if let Some(id) = session.active_id() {
        assert!(session.documents().contains(id), "active {id} not in store");
    }
}

#[test]
fn test_active_stays_valid_through_mixed_operations() {
    let (mut session, reader) =
        session_with(&[("a.txt", "a"), ("b.rs", "fn b() {}"), ("c.md", "# c")]);
    let a = open(&mut session, &reader, "a.txt");
    assert_active_valid(&session);
    let b = open(&mut session, &reader, "b.rs");
    assert_active_valid(&session);
    let c = open(&mut session, &reader, "c.md");
    assert_active_valid(&session);

    session.activate(Some(a)).unwrap();
    assert_active_valid(&session);
    session.close_document(b);
    assert_active_valid(&session);
    session.close_document(a);
    assert_eq!(session.active_id(), Some(c));
    session.close_document(c);
    assert_active_valid(&session);
    assert_eq!(session.active_id(), None);
}

#[test]
fn test_close_all_after_many_opens() {
    let (mut session, reader) = session_with(&[("one.txt", "1"), ("two.txt", "2")]);
    for _ in 0..5 {
        open(&mut session, &reader, "one.txt");
        open(&mut session, &reader, "two.txt");
    }
    assert_eq!(session.documents().len(), 10);

    session.close_all();
    assert!(session.documents().is_empty());
    assert_eq!(session.active_id(), None);
    assert!(session.search_state().is_empty());
}

#[test]
fn test_closing_active_falls_back_to_most_recent() {
    let (mut session, reader) = session_with(&[("a.txt", "a"), ("b.txt", "b"), ("c.txt", "c")]);
    let a = open(&mut session, &reader, "a.txt");
    let b = open(&mut session, &reader, "b.txt");
    let c = open(&mut session, &reader, "c.txt");

    session.activate(Some(b)).unwrap();
    session.close_document(b);
    assert_eq!(session.active_id(), Some(c));

    // Closing an inactive document leaves focus alone.
    session.close_document(a);
    assert_eq!(session.active_id(), Some(c));
}

#[test]
fn test_empty_query_has_no_results() {
    let (mut session, reader) = session_with(&[("a.txt", "some text")]);
    open(&mut session, &reader, "a.txt");

    assert_eq!(session.search("", SearchOptions::default()).unwrap(), 0);
    assert_eq!(session.advance_search(Direction::Forward), None);
    assert_eq!(session.search_state().current_index(), None);
}

#[test]
fn test_case_and_whole_word_searches() {
    let (mut session, reader) = session_with(&[("a.txt", "foo FOO"), ("b.txt", "foo foobar")]);
    open(&mut session, &reader, "a.txt");

    assert_eq!(session.search("foo", SearchOptions::default()).unwrap(), 2);
    let sensitive = SearchOptions {
        case_sensitive: true,
        ..Default::default()
    };
    assert_eq!(session.search("foo", sensitive).unwrap(), 1);

    open(&mut session, &reader, "b.txt");
    let whole = SearchOptions {
        whole_word: true,
        ..Default::default()
    };
    assert_eq!(session.search("foo", whole).unwrap(), 1);
    let first = session.search_state().current_match().unwrap();
    assert_eq!((first.start, first.end), (0, 3));
}

#[test]
fn test_search_cycles_through_matches() {
    let (mut session, reader) = session_with(&[("a.txt", "x x x")]);
    open(&mut session, &reader, "a.txt");
    session.search("x", SearchOptions::default()).unwrap();

    assert_eq!(session.search_state().current_index(), Some(0));
    assert_eq!(session.advance_search(Direction::Forward), Some(1));
    assert_eq!(session.advance_search(Direction::Forward), Some(2));
    assert_eq!(session.advance_search(Direction::Forward), Some(0));
    assert_eq!(session.advance_search(Direction::Backward), Some(2));
}

#[test]
fn test_invalid_regex_reports_and_keeps_matches() {
    let (mut session, reader) = session_with(&[("a.txt", "(a) (b)")]);
    open(&mut session, &reader, "a.txt");
    let events = session.subscribe();

    let regex = SearchOptions {
        use_regex: true,
        ..Default::default()
    };
    assert_eq!(session.search(r"\(\w\)", regex).unwrap(), 2);
    assert!(session.search("(unclosed", regex).is_err());
    assert_eq!(session.search_state().matches().len(), 2);

    let notices: Vec<String> = events
        .try_iter()
        .filter_map(|e| match e {
            SessionEvent::Notice(n) if n.level == NoticeLevel::Error => Some(n.message),
            _ => None,
        })
        .collect();
    assert_eq!(notices, vec!["Invalid regex pattern".to_string()]);
}

#[test]
fn test_compare_identical_and_changed_documents() {
    let (mut session, reader) = session_with(&[
        ("a.txt", "line1\nline2\nline3"),
        ("b.txt", "line1\nchanged\nline3\nline4"),
        ("copy.txt", "line1\nline2\nline3"),
    ]);
    let a = open(&mut session, &reader, "a.txt");
    let b = open(&mut session, &reader, "b.txt");
    let copy = open(&mut session, &reader, "copy.txt");

    let same = session.compare_documents(a, copy).unwrap();
    assert!(same.iter().all(|r| r.status == DiffStatus::Equal));

    let rows = session.compare_documents(a, b).unwrap();
    let shape: Vec<(usize, DiffStatus, &str)> = rows
        .iter()
        .map(|r| (r.line_number, r.status, r.text()))
        .collect();
    assert_eq!(
        shape,
        vec![
            (1, DiffStatus::Equal, "line1"),
            (2, DiffStatus::Removed, "line2"),
            (2, DiffStatus::Added, "changed"),
            (3, DiffStatus::Equal, "line3"),
            (4, DiffStatus::Added, "line4"),
        ]
    );
}

#[test]
fn test_open_completing_after_close_all_is_registered() {
    let (mut session, reader) = session_with(&[("a.txt", "a"), ("slow.txt", "late")]);
    open(&mut session, &reader, "a.txt");

    let pending = session.prepare_open(reader.input("slow.txt").unwrap());
    session.close_all();
    let content = pending.read(&reader);
    let id = session.finish_open(pending, content).unwrap();

    assert_eq!(session.documents().len(), 1);
    assert_eq!(session.active_id(), Some(id));
}

#[test]
fn test_failed_read_leaves_session_untouched() {
    let (mut session, mut reader) = session_with(&[("ok.txt", "fine")]);
    reader.insert("broken.txt", "x".as_bytes());
    reader.fail_on("broken.txt");
    let ok = open(&mut session, &reader, "ok.txt");
    let events = session.subscribe();

    let input = reader.input("broken.txt").unwrap();
    assert!(session.open_document(input, &reader).is_err());
    assert_eq!(session.documents().len(), 1);
    assert_eq!(session.active_id(), Some(ok));

    let received: Vec<SessionEvent> = events.try_iter().collect();
    assert!(matches!(
        received.as_slice(),
        [SessionEvent::Notice(n)] if n.message == "Failed to open: broken.txt"
    ));
}

#[test]
fn test_settings_persist_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs").join("storage.json");

    {
        let mut session = SessionController::new(Box::new(FileStore::open(&path)));
        session.toggle_word_wrap();
        session.save_settings().unwrap();
        session.set_theme(ThemeMode::Light).unwrap();
    }

    let session = SessionController::new(Box::new(FileStore::open(&path)));
    assert!(session.settings().word_wrap);
    assert_eq!(session.settings().theme, ThemeMode::Light);

    let mut session = session;
    session.reset_settings().unwrap();
    let fresh = SessionController::new(Box::new(FileStore::open(&path)));
    assert!(!fresh.settings().word_wrap);
    assert_eq!(fresh.settings().theme, ThemeMode::Dark);
}

#[test]
fn test_open_from_disk_and_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.md");
    std::fs::write(&path, "# Title\n\nbody\n").unwrap();

    let mut session = SessionController::new(Box::new(MemoryStore::new()));
    let id = session
        .open_document(RawInput::from_path(&path).unwrap(), &FsReader)
        .unwrap();

    let status = session.status();
    assert_eq!(status.file_type, "MD");
    assert_eq!(status.lines, Some(4));
    assert_eq!(session.export(id).unwrap(), b"# Title\n\nbody\n");
}
